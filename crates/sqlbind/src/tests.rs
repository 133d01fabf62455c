//! Integration tests covering full statement assembly.

use serde_json::json;

use crate::attr::{count, incr, raw};
use crate::builder::{Builder, SelectItem};
use crate::cond::Cond;
use crate::error::BuildError;
use crate::quoter::Quoter;
use crate::value::Value;

#[test]
fn test_select_star_with_where() {
    let mut b = Builder::new();
    b.select_all().from("user", None);
    b.where_(json!({"id": 1})).unwrap();
    let (sql, params) = b.build();
    assert_eq!(sql, "SELECT * FROM `user` WHERE `id` = ?");
    assert_eq!(params, vec![Value::Int(1)]);
}

#[test]
fn test_update_binds_in_map_order() {
    let mut b = Builder::new();
    b.update(
        "user",
        vec![
            ("name", crate::Operand::from("yf")),
            ("age", crate::Operand::from(30)),
        ],
    );
    let (sql, params) = b.build();
    assert_eq!(sql, "UPDATE `user` SET `name` = ?, `age` = ?");
    assert_eq!(params, vec![Value::Str("yf".into()), Value::Int(30)]);
}

#[test]
fn test_insert_binds_in_map_order() {
    let mut b = Builder::new();
    b.insert(
        "user",
        vec![
            ("name", crate::Operand::from("yf")),
            ("age", crate::Operand::from(30)),
        ],
    );
    let (sql, params) = b.build();
    assert_eq!(sql, "INSERT INTO `user` (`name`, `age`) VALUES (?, ?)");
    assert_eq!(params, vec![Value::Str("yf".into()), Value::Int(30)]);
}

#[test]
fn test_operator_tree_and_null() {
    let mut b = Builder::new();
    b.select_all().from("user", None);
    b.where_(json!({"age": {"$gte": 18}, "bb": null})).unwrap();
    let (sql, params) = b.build();
    assert_eq!(sql, "SELECT * FROM `user` WHERE `age` >= ? AND `bb` IS NULL");
    assert_eq!(params, vec![Value::Int(18)]);
}

#[test]
fn test_or_branch_map() {
    let mut b = Builder::new();
    b.select_all().from("user", None);
    b.where_(json!({"$or": {"a": 1, "b": 2}})).unwrap();
    let (sql, params) = b.build();
    assert_eq!(sql, "SELECT * FROM `user` WHERE (`a` = ? OR `b` = ?)");
    assert_eq!(params, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_order_directions() {
    let mut b = Builder::new();
    b.select_all()
        .from("user", None)
        .order(["-created_at", "id"]);
    let (sql, _) = b.build();
    assert_eq!(sql, "SELECT * FROM `user` ORDER BY `created_at` DESC, `id` ASC");
}

#[test]
fn test_placeholder_count_matches_params() {
    let mut b = Builder::new();
    b.select_all().from("user", None);
    b.where_(json!({
        "id": [1, 2, 3],
        "age": {"$between": [18, 30]},
        "name": {"$like": "y%"},
    }))
    .unwrap();
    b.limit(10, Some(20));
    let (sql, params) = b.build();
    let holders = sql.matches('?').count();
    assert_eq!(holders, params.len());
    assert_eq!(holders, 8);
}

#[test]
fn test_full_statement_shape() {
    let mut b = Builder::new();
    b.select([
        SelectItem::from("u.id"),
        SelectItem::alias("u.name", "username"),
        SelectItem::from(count("*")),
    ])
    .from("user", Some("u"));
    let on = b.q("u.id");
    b.left_join("profile", Some("p"), Cond::new().entry("p.user_id", on))
        .unwrap();
    b.where_(json!({"u.status": "active"})).unwrap();
    b.group(["u.city"]);
    b.having(json!({"c": {"$gt": 1}})).unwrap();
    b.order(["-u.created_at"]).limit(5, None);

    let (sql, params) = b.build();
    assert_eq!(
        sql,
        "SELECT `u`.`id`, `u`.`name` AS `username`, COUNT(*) \
         FROM `user` AS `u` \
         LEFT JOIN `profile` AS `p` ON (`p`.`user_id` = `u`.`id`) \
         WHERE `u`.`status` = ? \
         GROUP BY `u`.`city` \
         HAVING `c` > ? \
         ORDER BY `u`.`created_at` DESC \
         LIMIT ?"
    );
    assert_eq!(
        params,
        vec![Value::Str("active".into()), Value::Int(1), Value::Int(5)]
    );
}

#[test]
fn test_fluent_and_declarative_agree() {
    let mut a = Builder::new();
    a.select_all().from("user", None);
    a.where_(json!({
        "age": {"$gte": 18},
        "$or": {"role": "admin", "level": 9},
    }))
    .unwrap();

    let mut b = Builder::new();
    b.select_all().from("user", None);
    b.where_fn(|w| {
        w.gte("age", 18).or(|g| {
            g.eq("role", "admin").eq("level", 9);
        });
    });

    assert_eq!(a.build(), b.build());
}

#[test]
fn test_update_with_increment_and_raw() {
    let mut b = Builder::new();
    b.update(
        "post",
        vec![
            ("views", crate::Operand::from(incr("views", 1))),
            ("updated_at", crate::Operand::from(raw("NOW()"))),
        ],
    );
    b.where_(json!({"id": 7})).unwrap();
    let (sql, params) = b.build();
    assert_eq!(
        sql,
        "UPDATE `post` SET `views` = `views` + ?, `updated_at` = NOW() WHERE `id` = ?"
    );
    assert_eq!(params, vec![Value::Int(1), Value::Int(7)]);
}

#[test]
fn test_errors_do_not_mutate_statement() {
    let mut b = Builder::new();
    b.select_all().from("user", None);
    let before = b.build();

    assert_eq!(
        b.where_(json!({"id": []})).unwrap_err(),
        BuildError::EmptyValues("id".into())
    );
    assert_eq!(
        b.where_(json!({"id": {"$bogus": 1}})).unwrap_err(),
        BuildError::UnknownOperator("bogus".into())
    );
    assert_eq!(
        b.where_(json!({"age": {"$between": [1, 2, 3]}})).unwrap_err(),
        BuildError::BetweenValues
    );

    assert_eq!(b.build(), before);
}

#[test]
fn test_dialect_swap_changes_quoting_only() {
    let build = |quoter: Quoter| {
        let mut b = Builder::with_quoter(quoter);
        b.select_all().from("user", None);
        b.where_(json!({"id": 1})).unwrap();
        b.build()
    };
    let (mysql, p1) = build(Quoter::backtick());
    let (ansi, p2) = build(Quoter::double_quote());
    assert_eq!(mysql, "SELECT * FROM `user` WHERE `id` = ?");
    assert_eq!(ansi, "SELECT * FROM \"user\" WHERE \"id\" = ?");
    assert_eq!(p1, p2);
}

#[test]
fn test_every_operator_tag_renders() {
    let scalar_tags = [
        ("$eq", "="),
        ("$ne", "!="),
        ("$gte", ">="),
        ("$gt", ">"),
        ("$lte", "<="),
        ("$lt", "<"),
        ("$is", "IS"),
        ("$isnot", "IS NOT"),
        ("$not", "IS NOT"),
        ("$like", "LIKE"),
        ("$notlike", "NOT LIKE"),
        ("$ilike", "ILIKE"),
        ("$notilike", "NOT ILIKE"),
        ("$regexp", "REGEXP"),
        ("$notregexp", "NOT REGEXP"),
    ];
    for (tag, op) in scalar_tags {
        let mut b = Builder::new();
        b.where_(json!({"f": {tag: "v"}})).unwrap();
        let (sql, params) = b.build();
        assert_eq!(sql, format!("WHERE `f` {op} ?"), "tag {tag}");
        assert_eq!(params.len(), 1, "tag {tag}");
    }

    let list_tags = [("$in", "IN"), ("$notin", "NOT IN")];
    for (tag, op) in list_tags {
        let mut b = Builder::new();
        b.where_(json!({"f": {tag: [1, 2]}})).unwrap();
        let (sql, params) = b.build();
        assert_eq!(sql, format!("WHERE `f` {op} (?, ?)"), "tag {tag}");
        assert_eq!(params.len(), 2, "tag {tag}");
    }

    let range_tags = [("$between", "BETWEEN"), ("$notbetween", "NOT BETWEEN")];
    for (tag, op) in range_tags {
        let mut b = Builder::new();
        b.where_(json!({"f": {tag: [1, 2]}})).unwrap();
        let (sql, params) = b.build();
        assert_eq!(sql, format!("WHERE `f` {op} ? AND ?"), "tag {tag}");
        assert_eq!(params.len(), 2, "tag {tag}");
    }
}

#[test]
fn test_raw_passes_through_unquoted() {
    let mut b = Builder::new();
    b.select([SelectItem::from(raw("COUNT(DISTINCT ip)"))])
        .from("visit", None);
    let (sql, _) = b.build();
    assert_eq!(sql, "SELECT COUNT(DISTINCT ip) FROM `visit`");
}

use sqlblock::{Arg, Direction, Expr, QbError, StatementKind, Value, dialect};

#[test]
fn postgres_select_with_nested_from_and_join() {
    let pg = dialect("postgres").unwrap();

    let recent = pg
        .select()
        .fields(&["user_id", "max(created_at) AS last_at"])
        .unwrap()
        .from("orders")
        .unwrap()
        .where_(Expr::gte("created_at", "2024-01-01"))
        .group("user_id")
        .unwrap();

    let q = pg
        .select()
        .field("u.id")
        .unwrap()
        .field_as("r.last_at", "last_order")
        .unwrap()
        .from_as("users", "u")
        .unwrap()
        .left_join(recent, Some("r"), "r.user_id = u.id")
        .unwrap()
        .where_(Expr::eq("u.active", true))
        .order("r.last_at", Some(Direction::Desc))
        .unwrap()
        .limit(20)
        .offset(40);

    let p = q.to_param().unwrap();
    assert_eq!(
        p.text,
        "SELECT u.id, r.last_at AS \"last_order\" FROM users \"u\" \
         LEFT JOIN (SELECT user_id, max(created_at) AS last_at FROM orders WHERE (created_at >= $1) GROUP BY user_id) \"r\" \
         ON (r.user_id = u.id) WHERE (u.active = $2) ORDER BY r.last_at DESC LIMIT $3 OFFSET $4"
    );
    assert_eq!(
        p.values,
        vec![
            Value::Text("2024-01-01".into()),
            Value::Bool(true),
            Value::Int(20),
            Value::Int(40),
        ]
    );
}

#[test]
fn insert_update_delete_round() {
    let d = dialect("mysql").unwrap();

    let ins = d
        .insert()
        .into("users")
        .unwrap()
        .set_fields(vec![("name", Value::from("ann")), ("age", Value::from(31i32))])
        .unwrap();
    assert_eq!(
        ins.to_sql().unwrap(),
        "INSERT INTO users (name, age) VALUES ('ann', 31)"
    );

    let upd = d
        .update()
        .table_as("users", "u")
        .unwrap()
        .set("u.age", 32i32)
        .unwrap()
        .where_(Expr::eq("u.name", "ann"));
    assert_eq!(
        upd.to_sql().unwrap(),
        "UPDATE users `u` SET u.age = 32 WHERE (u.name = 'ann')"
    );

    let del = d
        .delete()
        .from("users")
        .unwrap()
        .where_(Expr::not_in("id", vec![1i32, 2]));
    let p = del.to_param().unwrap();
    assert_eq!(p.text, "DELETE FROM users WHERE (id NOT IN (?, ?))");
    assert_eq!(p.values, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn in_sub_query_condition() {
    let d = dialect("postgres").unwrap();
    let banned = d
        .select()
        .field("user_id")
        .unwrap()
        .from("bans")
        .unwrap()
        .where_(Expr::eq("active", true));
    let q = d
        .select()
        .from("users")
        .unwrap()
        .where_(Expr::eq("org", 9i32))
        .where_(Expr::not_in_query("id", banned));
    let p = q.to_param().unwrap();
    assert_eq!(
        p.text,
        "SELECT * FROM users WHERE (org = $1) AND (id NOT IN (SELECT user_id FROM bans WHERE (active = $2)))"
    );
    assert_eq!(p.values, vec![Value::Int(9), Value::Bool(true)]);
}

#[test]
fn template_arguments_mix_values_and_queries() {
    let d = dialect("postgres").unwrap();
    let sub = d.select().field("id").unwrap().from("admins").unwrap();
    let q = d.select().from("users").unwrap().where_(Expr::template(
        "id IN ? OR owner = ?",
        vec![Arg::query(sub), Arg::value(7i32)],
    ));
    let p = q.to_param().unwrap();
    assert_eq!(
        p.text,
        "SELECT * FROM users WHERE (id IN (SELECT id FROM admins) OR owner = $1)"
    );
    assert_eq!(p.values, vec![Value::Int(7)]);
}

#[test]
fn identifier_errors_surface_at_call_time() {
    let d = dialect("default").unwrap();
    assert!(matches!(
        d.select().from(""),
        Err(QbError::InvalidArgument(_))
    ));
    assert!(matches!(
        d.select().field_as("a", " "),
        Err(QbError::InvalidArgument(_))
    ));
    assert!(matches!(
        d.update().table(d.select()),
        Err(QbError::InvalidArgument(_))
    ));
    assert!(matches!(
        d.select().from_table(Some("s"), ("a", "b"), None),
        Err(QbError::InvalidArgument(_))
    ));
}

#[test]
fn completeness_errors_surface_at_render_time() {
    let d = dialect("default").unwrap();
    let upd = d.update().table("t").unwrap();
    assert!(matches!(upd.to_sql(), Err(QbError::IncompleteStatement(_))));
    let ins = d.insert().set("a", 1i32).unwrap();
    assert!(matches!(ins.to_param(), Err(QbError::IncompleteStatement(_))));
}

#[test]
fn non_nestable_kinds_are_reported() {
    let d = dialect("default").unwrap();
    let ins = d.insert().into("t").unwrap().set("a", 1i32).unwrap();
    let err = d.select().join(ins, None, "").unwrap_err();
    assert_eq!(err, QbError::UnsupportedNesting(StatementKind::Insert));
}

#[test]
fn builders_render_from_other_threads() {
    let q = dialect("postgres")
        .unwrap()
        .select()
        .from("t")
        .unwrap()
        .where_(Expr::eq("a", 1i32));
    let expected = q.to_param().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let q = q.clone();
            std::thread::spawn(move || q.to_param().unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

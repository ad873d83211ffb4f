#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::{
        Error, Expr, Field, Flavor, OnConflict, SqlValue, Table, and, excluded, excluded_of, func,
        insert, lit, null, or, param, select, with,
    };
    use pretty_assertions::assert_eq;

    fn pg(node: &impl Builder) -> (String, Vec<SqlValue>) {
        let (sql, args) = node.build_with_flavor(Flavor::Positional).unwrap();
        (sql.unwrap_or_default(), args.into_values())
    }

    #[test]
    fn columns_only() {
        let t = Table::new("t");
        let q = insert(&t, [Field::from("id"), Field::from(t.column("name"))]).unwrap();
        assert_eq!(pg(&q), ("INSERT INTO t (id, name)".into(), vec![]));
    }

    #[test]
    fn column_list_must_not_be_empty() {
        let t = Table::new("t");
        assert_eq!(
            insert(&t, Vec::<Field>::new()),
            Err(Error::Empty("INSERT column list"))
        );
    }

    #[test]
    fn values() {
        let t = Table::new("t");
        let q = insert(&t, ["c1", "c2", "c3", "c4", "c5"])
            .unwrap()
            .values([crate::exprs![
                1,
                lit(2),
                "abc",
                lit("xyz"),
                param(55).cast("int")
            ]])
            .unwrap();
        assert_eq!(
            pg(&q),
            (
                "INSERT INTO t (c1, c2, c3, c4, c5) VALUES ($1, 2, $2, 'xyz', $3::int)".into(),
                vec![SqlValue::I64(1), SqlValue::from("abc"), SqlValue::I64(55)]
            )
        );

        let q = insert(&t, ["c1", "c2"])
            .unwrap()
            .values([[1, 2], [3, 4]])
            .unwrap();
        assert_eq!(
            pg(&q).0,
            "INSERT INTO t (c1, c2) VALUES ($1, $2), ($3, $4)"
        );
    }

    #[test]
    fn values_arity_is_checked() {
        let t = Table::new("t");
        let q = insert(&t, ["c1", "c2"]).unwrap();
        assert_eq!(
            q.values([vec![1, 2], vec![3]]),
            Err(Error::ValuesArity {
                row: 1,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn values_and_select_are_exclusive() {
        let t = Table::new("t");
        let s = select([lit(1), lit(2)]);
        let base = insert(&t, ["c1", "c2"]).unwrap();

        let with_values = base.values([[1, 2]]).unwrap();
        assert_eq!(with_values.select(&s), Err(Error::ValuesWithSelect));

        let with_select = base.select(&s).unwrap();
        assert_eq!(with_select.values([[1, 2]]), Err(Error::ValuesWithSelect));
    }

    #[test]
    fn returning() {
        let t = Table::new("t");
        let base = insert(&t, ["c1", "c2"]).unwrap();

        assert_eq!(
            pg(&base.returning([t.column("id1"), t.column("id2")])).0,
            "INSERT INTO t (c1, c2) RETURNING t.id1, t.id2"
        );
        assert_eq!(
            pg(&base.returning([t.star()])).0,
            "INSERT INTO t (c1, c2) RETURNING t.*"
        );
        assert_eq!(
            pg(&base
                .values([[1, 2]])
                .unwrap()
                .returning([t.column("id")])),
            (
                "INSERT INTO t (c1, c2) VALUES ($1, $2) RETURNING t.id".into(),
                vec![SqlValue::I64(1), SqlValue::I64(2)]
            )
        );
        assert_eq!(
            pg(&base
                .values([crate::exprs![1, func("now", Vec::<Expr>::new())]])
                .unwrap()
                .returning([t.column("id")]))
            .0,
            "INSERT INTO t (c1, c2) VALUES ($1, NOW()) RETURNING t.id"
        );
    }

    #[test]
    fn insert_select() {
        let (t, t2) = (Table::new("t"), Table::new("t2"));
        let s = select([t.column("id"), t.column("dt")])
            .from([&t])
            .where_([t.column("id").greater_than(5), t.column("id").less_than(10)])
            .order_by([t.column("id").desc()])
            .limit(2)
            .offset(7);
        let q = insert(&t2, ["id", "dt"]).unwrap().select(&s).unwrap();
        assert_eq!(
            pg(&q),
            (
                "INSERT INTO t2 (id, dt) SELECT id, dt FROM t WHERE id > $1 AND id < $2 \
                 ORDER BY id DESC LIMIT $3 OFFSET $4"
                    .into(),
                vec![
                    SqlValue::I64(5),
                    SqlValue::I64(10),
                    SqlValue::I64(2),
                    SqlValue::I64(7)
                ]
            )
        );

        let q = insert(&t2, ["id", "dt"])
            .unwrap()
            .select(&select([t.column("id"), t.column("dt")]).from([&t]))
            .unwrap()
            .returning([t2.column("name")]);
        assert_eq!(
            pg(&q).0,
            "INSERT INTO t2 (id, dt) SELECT id, dt FROM t RETURNING t2.name"
        );
    }

    #[test]
    fn insert_with_cte() {
        let (t, t2) = (Table::new("t"), Table::new("t2"));
        let q1 = select([t.column("id")])
            .from([&t])
            .where_([t.column("id").equal(lit(1))])
            .subquery("s1")
            .unwrap()
            .materialized(true);
        let q2 = select([t2.column("id")])
            .from([&t2])
            .where_([t2.column("id").equal(lit(2))])
            .subquery("s2")
            .unwrap();

        let source = select([q1.column("id").as_("id2")]).from([&q1]).union(
            &select([q2.column("id")])
                .from([&q2])
                .where_([q2.column("id").greater_than(lit(0))]),
        );
        let q = with([q1.clone()])
            .unwrap()
            .insert(&t, ["id"])
            .unwrap()
            .select(&source)
            .unwrap()
            .returning([t.star()]);
        assert_eq!(
            pg(&q),
            (
                "WITH s1 AS MATERIALIZED (SELECT id FROM t WHERE id = 1) \
                 INSERT INTO t (id) SELECT id AS id2 FROM s1 \
                 UNION SELECT id FROM (SELECT id FROM t2 WHERE id = 2) AS s2 WHERE id > 0 \
                 RETURNING t.*"
                    .into(),
                vec![]
            )
        );
    }

    #[test]
    fn insert_from_unnest() {
        let t = Table::new("t");
        let ids = param(vec![101, 102]).cast("int[]");
        let names = param(vec!["A", "B"]).cast("text[]");

        let q = insert(&t, ["id", "name"])
            .unwrap()
            .select(&select([
                func("unnest", [ids.clone()]),
                func("unnest", [names.clone()]),
            ]))
            .unwrap();
        assert_eq!(
            pg(&q),
            (
                "INSERT INTO t (id, name) SELECT UNNEST($1::int[]), UNNEST($2::text[])".into(),
                vec![SqlValue::from(vec![101, 102]), SqlValue::from(vec!["A", "B"])]
            )
        );

        let f = crate::Relation::function(func("unnest", [ids, names]).as_("x(a, b)"));
        let q = insert(&t, ["id", "name"])
            .unwrap()
            .select(&select([f.column("a"), f.column("b")]).from([f.clone()]))
            .unwrap();
        assert_eq!(
            pg(&q).0,
            "INSERT INTO t (id, name) SELECT a, b FROM UNNEST($1::int[], $2::text[]) AS x(a, b)"
        );
    }

    #[test]
    fn on_conflict_constraint() {
        let t = Table::new("t");
        let q = insert(&t, [t.column("id")])
            .unwrap()
            .on_conflict(OnConflict::new().constraint("cc_uniq").do_nothing())
            .unwrap();
        assert_eq!(
            pg(&q).0,
            "INSERT INTO t (id) ON CONFLICT ON CONSTRAINT cc_uniq DO NOTHING"
        );
    }

    #[test]
    fn on_conflict_index_elements() {
        let t = Table::new("t");
        let oc = OnConflict::new()
            .index_elements([
                t.column("data").op("->>", "key1"),
                t.column("data").op("->>", "key2").cast("int"),
                t.column("name"),
            ])
            .do_nothing();
        let q = insert(&t, [t.column("id")]).unwrap().on_conflict(oc).unwrap();
        assert_eq!(
            pg(&q),
            (
                "INSERT INTO t (id) ON CONFLICT ((data ->> $1), ((data ->> $2)::int), name) DO NOTHING"
                    .into(),
                vec![SqlValue::from("key1"), SqlValue::from("key2")]
            )
        );
    }

    #[test]
    fn on_conflict_index_where() {
        let t = Table::new("t");
        let oc = OnConflict::new()
            .index_elements([t.column("id")])
            .index_where(t.column("id").greater_than(-5))
            .do_nothing();
        let q = insert(&t, [t.column("id")]).unwrap().on_conflict(oc).unwrap();
        assert_eq!(
            pg(&q),
            (
                "INSERT INTO t (id) ON CONFLICT (id) WHERE id > $1 DO NOTHING".into(),
                vec![SqlValue::I64(-5)]
            )
        );

        let oc = OnConflict::new()
            .index_elements([t.column("id")])
            .index_where(and([
                t.column("id").equal(null()),
                or([
                    t.column("name").cast("text").equal("ololo"),
                    t.column("age").greater_than(param(100).cast("float")),
                ]),
            ]))
            .do_nothing();
        let q = insert(&t, [t.column("id")]).unwrap().on_conflict(oc).unwrap();
        assert_eq!(
            pg(&q),
            (
                "INSERT INTO t (id) ON CONFLICT (id) \
                 WHERE id IS NULL AND (name::text = $1 OR age > $2::float) DO NOTHING"
                    .into(),
                vec![SqlValue::from("ololo"), SqlValue::I64(100)]
            )
        );
    }

    #[test]
    fn on_conflict_do_nothing() {
        let t = Table::new("t");
        let q = insert(&t, [t.column("id")])
            .unwrap()
            .on_conflict(OnConflict::new().do_nothing())
            .unwrap();
        assert_eq!(pg(&q).0, "INSERT INTO t (id) ON CONFLICT DO NOTHING");
    }

    #[test]
    fn on_conflict_do_update() {
        let t = Table::new("t");
        let oc = OnConflict::new()
            .index_elements([t.column("col5")])
            .do_update([(t.column("col1"), lit(15))]);
        let q = insert(&t, [t.column("id")]).unwrap().on_conflict(oc).unwrap();
        assert_eq!(
            pg(&q).0,
            "INSERT INTO t (id) ON CONFLICT (col5) DO UPDATE SET col1 = 15"
        );
    }

    #[test]
    fn on_conflict_do_update_with_excluded() {
        let t = Table::new("t");
        let oc = OnConflict::new().do_update([
            (Field::from("col1"), Expr::from(12)),
            (t.column("col2").into(), t.column("col2").plus(5)),
            (
                t.column("col3").into(),
                excluded("col8").cast("int").times(88),
            ),
            (
                t.column("col4").into(),
                excluded_of(&t.column("col15"))
                    .unwrap()
                    .times(t.column("col44").cast("float")),
            ),
        ]);
        let q = insert(&t, [t.column("id")]).unwrap().on_conflict(oc).unwrap();
        assert_eq!(
            pg(&q),
            (
                "INSERT INTO t (id) ON CONFLICT DO UPDATE SET col1 = $1, col2 = t.col2 + $2, \
                 col3 = excluded.col8::int * $3, col4 = excluded.col15 * t.col44::float"
                    .into(),
                vec![SqlValue::I64(12), SqlValue::I64(5), SqlValue::I64(88)]
            )
        );
    }

    #[test]
    fn excluded_of_requires_a_column() {
        assert_eq!(excluded_of(&lit(1)), Err(Error::NotAColumn("excluded")));
        let t = Table::new("t");
        let e = excluded_of(&t.column("name").cast("text")).unwrap();
        assert_eq!(pg(&e).0, "excluded.name::text");
    }

    #[test]
    fn on_conflict_combinations_are_validated() {
        let t = Table::new("t");
        let q = insert(&t, [t.column("id")]).unwrap();

        assert!(matches!(
            q.on_conflict(
                OnConflict::new()
                    .constraint("c")
                    .index_elements([t.column("id")])
                    .do_nothing()
            ),
            Err(Error::OnConflict(_))
        ));
        assert!(matches!(
            q.on_conflict(
                OnConflict::new()
                    .index_where(t.column("id").greater_than(0))
                    .do_nothing()
            ),
            Err(Error::OnConflict(_))
        ));
        assert!(matches!(
            q.on_conflict(
                OnConflict::new()
                    .do_nothing()
                    .do_update([(t.column("a"), lit(1))])
            ),
            Err(Error::OnConflict(_))
        ));
        assert!(matches!(
            q.on_conflict(OnConflict::new()),
            Err(Error::OnConflict(_))
        ));
    }

    #[test]
    fn excluded_cannot_be_a_from_source() {
        let q = select([excluded("id")]).from([crate::Relation::Excluded]);
        assert_eq!(
            q.build_with_flavor(Flavor::Positional),
            Err(Error::ExcludedInFrom)
        );
    }
}

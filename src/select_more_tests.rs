#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::{Error, Flavor, SqlValue, Table, func, lit, select};
    use pretty_assertions::assert_eq;

    fn pg(node: &impl Builder) -> (String, Vec<SqlValue>) {
        let (sql, args) = node.build_with_flavor(Flavor::Positional).unwrap();
        (sql.unwrap_or_default(), args.into_values())
    }

    #[test]
    fn nested_select_columns() {
        let (t, t2) = (Table::new("t"), Table::new("t2"));

        let q = crate::select![
            lit(1),
            select([t2.column("id")])
                .from([&t2])
                .where_([t2.column("id").equal(t.column("id"))])
                .as_("count"),
        ]
        .from([&t]);
        assert_eq!(
            pg(&q).0,
            "SELECT 1, (SELECT id FROM t2 WHERE id = t.id) AS count FROM t"
        );

        let q = crate::select![
            1,
            select([t2.column("id")])
                .from([&t2])
                .where_([
                    t2.column("id").equal(t.column("id")),
                    t2.column("age").equal(10),
                ])
                .cast("int")
                .as_("count"),
        ]
        .from([&t]);
        assert_eq!(
            pg(&q),
            (
                "SELECT $1, ((SELECT id FROM t2 WHERE id = t.id AND age = $2)::int) AS count FROM t"
                    .into(),
                vec![SqlValue::I64(1), SqlValue::I64(10)]
            )
        );

        let q = crate::select![lit("abc"), select([lit("xyz")]).from([&t])];
        assert_eq!(pg(&q).0, "SELECT 'abc', (SELECT 'xyz' FROM t)");
    }

    #[test]
    fn subquery_alone() {
        let t = Table::new("t");
        let sq = select([t.column("id"), t.column("name")])
            .from([&t])
            .where_([t.column("id").equal(12)])
            .subquery("x")
            .unwrap();
        assert_eq!(
            pg(&sq),
            (
                "(SELECT id, name FROM t WHERE id = $1) AS x".into(),
                vec![SqlValue::I64(12)]
            )
        );
    }

    #[test]
    fn subquery_alias_must_not_be_empty() {
        let t = Table::new("t");
        let q = select([t.column("id")]).from([&t]);
        assert_eq!(q.subquery(""), Err(Error::Empty("subquery alias")));
        assert!(q.subquery("x").unwrap().as_("").is_err());
    }

    #[test]
    fn select_from_subquery() {
        let t = Table::new("t");
        let sq = select([t.column("id"), t.column("name")])
            .from([&t])
            .where_([t.column("id").equal(10)])
            .order_by([t.column("id").desc()])
            .limit(1)
            .subquery("sq")
            .unwrap();
        let q = select([sq.column("id"), sq.column("name").cast("text").as_("name2")])
            .from([&sq])
            .where_([sq.column("id").equal(100)]);
        assert_eq!(
            pg(&q),
            (
                "SELECT id, name::text AS name2 \
                 FROM (SELECT id, name FROM t WHERE id = $1 ORDER BY id DESC LIMIT $2) AS sq \
                 WHERE id = $3"
                    .into(),
                vec![SqlValue::I64(10), SqlValue::I64(1), SqlValue::I64(100)]
            )
        );
    }

    #[test]
    fn subquery_realias_combines_with_tables() {
        let (t, t2) = (Table::new("t"), Table::new("t2"));
        let sq = select([t.column("id"), t.column("name")])
            .from([&t])
            .subquery("sq")
            .unwrap()
            .as_("x")
            .unwrap();
        let q = select([sq.star(), t2.column("name")])
            .from([crate::Relation::from(&t2), crate::Relation::from(&sq)])
            .where_([t2.column("id").equal(sq.column("id"))]);
        assert_eq!(
            pg(&q),
            (
                "SELECT x.*, t2.name FROM t2, (SELECT id, name FROM t) AS x WHERE t2.id = x.id"
                    .into(),
                vec![]
            )
        );
    }

    #[test]
    fn select_decorations_are_dropped_by_subquery() {
        let t = Table::new("t");
        let sq = select([t.column("id")])
            .from([&t])
            .cast("int")
            .as_("ignored")
            .subquery("x")
            .unwrap();
        assert_eq!(pg(&sq).0, "(SELECT id FROM t) AS x");
    }

    #[test]
    fn join_subquery() {
        let (t, t2) = (Table::new("t"), Table::new("t2"));
        let sq = select([t.column("id")]).from([&t]).subquery("x").unwrap();
        let q = select([t2.column("id"), sq.column("id")])
            .from([&t2])
            .join(&sq, sq.column("id").equal(t2.column("id")));
        assert_eq!(
            pg(&q).0,
            "SELECT t2.id, x.id FROM t2 JOIN (SELECT id FROM t) AS x ON x.id = t2.id"
        );
    }

    #[test]
    fn join_lateral() {
        let (t, t2) = (Table::new("t"), Table::new("t2"));
        let sq = select([t.column("id")])
            .from([&t])
            .where_([t.column("id").equal(t2.column("id"))])
            .subquery("x")
            .unwrap();

        let q = select([t2.column("id"), sq.column("id")])
            .from([&t2])
            .join_lateral(&sq, true);
        assert_eq!(
            pg(&q).0,
            "SELECT t2.id, x.id FROM t2 JOIN LATERAL (SELECT id FROM t WHERE id = t2.id) AS x ON TRUE"
        );

        let q = select([t2.column("id"), sq.column("id")])
            .from([&t2])
            .join_lateral(&sq, sq.column("id").equal(11));
        assert_eq!(
            pg(&q),
            (
                "SELECT t2.id, x.id FROM t2 JOIN LATERAL (SELECT id FROM t WHERE id = t2.id) AS x ON x.id = $1"
                    .into(),
                vec![SqlValue::I64(11)]
            )
        );

        let q = select([t2.column("id"), sq.column("id")])
            .from([&t2])
            .left_join_lateral(&sq, true);
        assert_eq!(
            pg(&q).0,
            "SELECT t2.id, x.id FROM t2 LEFT JOIN LATERAL (SELECT id FROM t WHERE id = t2.id) AS x ON TRUE"
        );
    }

    #[test]
    fn any_of_casted_subquery() {
        let (t, t2) = (Table::new("t"), Table::new("t2"));
        let inner = select([func("array_agg", [t2.column("col")])])
            .from([&t2])
            .join(&t, t.column("id").equal(t2.column("col")))
            .cast("int[]");
        let q = select([t.column("id")])
            .from([&t])
            .where_([t.column("id").any(inner)]);
        assert_eq!(
            pg(&q).0,
            "SELECT id FROM t WHERE id = ANY(((SELECT ARRAY_AGG(t2.col) FROM t2 JOIN t ON t.id = t2.col)::int[]))"
        );
    }

    #[test]
    fn in_subquery_with_join() {
        let (t, t2) = (Table::new("t"), Table::new("t2"));
        let inner = select([t2.column("col")])
            .from([&t2])
            .join(&t, t.column("id").equal(t2.column("col")));
        let q = select([t.column("id")])
            .from([&t])
            .where_([t.column("id").in_select(&inner)]);
        assert_eq!(
            pg(&q).0,
            "SELECT id FROM t WHERE id IN (SELECT t2.col FROM t2 JOIN t ON t.id = t2.col)"
        );
    }

    #[test]
    fn scalar_subquery_operand() {
        let (t, t2) = (Table::new("t"), Table::new("t2"));
        let inner = select([t2.column("dt")])
            .from([&t2])
            .where_([t2.column("id").equal(lit(2))]);
        let q = select([t.column("id")])
            .from([&t])
            .where_([t.column("dt").equal(inner)]);
        assert_eq!(
            pg(&q).0,
            "SELECT id FROM t WHERE dt = (SELECT dt FROM t2 WHERE id = 2)"
        );
    }

    #[test]
    fn named_flavor() {
        let t = Table::new("t");
        let q = select([t.column("id")])
            .from([&t])
            .where_([t.column("id").equal(1), t.column("name").equal("x")]);
        let (sql, args) = q.build_with_flavor(Flavor::Named).unwrap();
        assert_eq!(
            sql.as_deref(),
            Some("SELECT id FROM t WHERE id = %(p1)s AND name = %(p2)s")
        );
        assert_eq!(args.get("p1"), Some(&SqlValue::I64(1)));
        assert_eq!(args.get("p2"), Some(&SqlValue::from("x")));
    }
}

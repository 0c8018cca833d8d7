//! Every statement form prints back to text that parses to the same tree

mod common;

use common::assert_round_trip;

#[test]
fn test_select_statements_round_trip() {
    let statements = [
        "select * from Trade",
        "@Name('vwap') @Description(\"volume weighted\") select sym, sum(price * volume) / sum(volume) as vwap \
         from Trade#time(5 minutes 30 seconds) group by sym having sum(volume) > 0 \
         output last every 10 seconds order by vwap desc limit 5",
        "select irstream distinct a.id, b.* as rest from Purchase(price > 10).win:length(100) as a unidirectional, \
         Fill#lastevent as b where a.id = b.oid",
        "select * from A as a left outer join B as b on a.id = b.id and a.k = b.k inner join C on a.id = C.id",
        "select * from A full outer join B on A.x = B.x",
        "select case when a > 1 then 'hi' else 'lo' end as c, coalesce(a, b, 0) from A \
         where a in (1, 2, 3) and b between 1 and 10 and s like 'x%' and not (a is null)",
        "select a from A where a not in [1:5) or b regexp '^x' or c != 2 or d <> 3",
        "select a || b || c, -x, -(a + b), 2 * (a - b) % 3 from A",
        "select a, b from A group by rollup(a, b), cube(c)",
        "select a from A group by grouping sets((a, b), (), c)",
        "select * from A output after 10 events first every 2 minutes",
        "select a from A output when total > 10 then set total = 0",
        "select a from A output at (*/5, *, *, *, *)",
        "select a from A output snapshot when terminated and a > 1",
        "select * from A limit 10 offset 20",
        "into table Agg select sum(x) as s from A group by k",
        "insert istream into Alerts(id, bid) event-precedence(2) select a.id, b.id from A as a, B as b",
        "select * from sql:mydb ['select * from t where id = ${a.id}' metadatasql 'select 1'] as s, A as a",
        "select * from method:com.acme.Lookup.find(a.id) @type(Row) as m, A as a",
        "select a.items.anyOf(i => i.qty > 0).count() from A as a",
        "select {1, 2, 3} as arr from A",
        "select ? as p, ?:lim:int as q from A",
        "select a from A where exists (select * from B#keepall where B.id = A.id)",
        "select a from A where a > all (select b from B#length(10))",
        "select * from A for grouped_delivery(a)",
        "context ByHour select count(*) from Trade",
        "select o.id from Order as o, Window#lastevent as w",
        "select cast(a, double, fmt: cast(b, int, fmt: 'x')) from A",
    ];
    for source in statements {
        assert_round_trip(source);
    }
}

#[test]
fn test_pattern_statements_round_trip() {
    let statements = [
        "insert into Alerts select a.id as id from pattern [every a=Login -> b=Logout(user = a.user) where timer:within(1 hour)]",
        "select * from pattern [every (A or B) -> not C and D]",
        "select * from pattern [[2:5] A until B -[10]> C]",
        "select * from pattern [every-distinct(a.id, 10 seconds) a=A -> timer:interval(5 seconds)]",
        "select * from pattern @SuppressOverlappingMatches [every [3] A@consume(2) while (A.x > 0)]",
    ];
    for source in statements {
        assert_round_trip(source);
    }
}

#[test]
fn test_match_recognize_round_trip() {
    assert_round_trip(
        "select * from Ticks match_recognize (partition by sym measures A.price as a, last(B.price) as b \
         all matches after match skip to next row pattern (A B+? (C | D){1,3} E*) \
         interval 5 seconds or terminated define B as B.price > A.price, C as C.price < 0)",
    );
}

#[test]
fn test_create_statements_round_trip() {
    let statements = [
        "create window Orders#keepall as select * from OrderEvent",
        "create window Prices#unique(sym) retain-intersection as (sym string, price double, tags string[])",
        "create window Recent#time(30 seconds) as select a, b as bb, 0 as zero from Trade insert where a > 0",
        "create unique index Idx on Orders(id hash, (lo, hi) btree)",
        "create variable int threshold = 10",
        "create constant variable string prefix = 'acme'",
        "create table Totals (sym string primary key, total sum(double), cnt count(*))",
        "create json schema Tick as (sym string, price double) inherits Base, Audit",
        "create schema Combined as A, com.acme.B, *",
        "create context SegmentedBySym partition by sym from Trade",
        "create context Hours start (0, 9, *, *, *) end (0, 17, *, *, *)",
        "create context Both context A as partition by sym from Trade, context B as start @now end after 1 hour",
        "create context Sessions initiated by distinct(id) @now and s:Open terminated by Close(id = s.id)",
        "create context Bands group by x < 0 as low, group by x >= 0 as high from Reading",
        "create expression double twice(x) { x * 2 }",
        "create expression js:fact(n) [ n <= 1 ? 1 : n * fact(n - 1) ]",
        "create expression total alias for { a + b }",
        "create dataflow Flow create schema Tick(sym string), Emitter -> ticks<Tick> { iterations: 10 } LogSink(ticks) {}",
    ];
    for source in statements {
        assert_round_trip(source);
    }
}

#[test]
fn test_on_and_fire_and_forget_round_trip() {
    let statements = [
        "on Cancel as c delete from Orders as o where o.id = c.id",
        "on Tick as t merge into Prices as p where p.sym = t.sym \
         when matched then update set price = t.price \
         when not matched then insert select t.sym as sym, t.price as price",
        "on Reset set total = 0",
        "on NewOrder insert into Big select * where qty > 100 insert into Small select * output all",
        "on pattern [every timer:interval(10 seconds)] select and delete * from Orders order by id limit 5",
        "on Fill as f update Orders as o set o.filled = true where o.id = f.id",
        "update istream Quote set price = price * 2 where sym = 'X'",
        "delete from Orders where id = 1",
        "insert into Orders(id, qty) values (1, 10), (2, 20)",
        "expression inc { x => x + 1 } select inc(a) from A",
    ];
    for source in statements {
        assert_round_trip(source);
    }
}

#[test]
fn test_printing_normalizes_spelling() {
    let printed = assert_round_trip("SELECT * FROM A#time(1 hour) as a;");
    assert_eq!(printed, "select * from A#time(1 hours) as a");
}

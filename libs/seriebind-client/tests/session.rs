use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use seriebind::{Point, Record, Series, Value};
use seriebind_client::{BoxFuture, ClientError, PointWriter, QueryExecutor, Session};

#[derive(Record, Default, Debug, PartialEq)]
struct HostLoad {
    host: String,
    load: f64,
}

#[derive(Record, Default, Debug, PartialEq)]
#[series(measurement = "weather")]
struct Weather {
    #[series(",time")]
    time: DateTime<Utc>,

    #[series("city,tag")]
    city: String,

    temperature: f64,
}

struct FixedExecutor {
    series: Vec<Series>,
}

impl QueryExecutor for FixedExecutor {
    fn query(&self, _database: &str, _command: &str) -> BoxFuture<'_, Result<Vec<Series>, ClientError>> {
        let series = self.series.clone();
        Box::pin(async move { Ok(series) })
    }
}

#[derive(Default)]
struct CapturingWriter {
    points: Mutex<Vec<Point>>,
}

impl PointWriter for CapturingWriter {
    fn write(&self, _database: &str, points: Vec<Point>) -> BoxFuture<'_, Result<(), ClientError>> {
        Box::pin(async move {
            self.points.lock().unwrap().extend(points);
            Ok(())
        })
    }
}

fn session_with(series: Vec<Series>) -> (Session, Arc<CapturingWriter>) {
    let writer = Arc::new(CapturingWriter::default());
    let session = Session::new(
        Arc::new(FixedExecutor { series }),
        writer.clone(),
        "metrics",
    );
    (session, writer)
}

#[tokio::test]
async fn query_into_binds_first_series() {
    let series = Series {
        name: "system".into(),
        columns: vec!["host".into(), "load".into()],
        values: vec![
            vec![Value::String("a".into()), Value::Float(0.5)],
            vec![Value::String("b".into()), Value::Float(1.5)],
        ],
        tags: HashMap::new(),
    };
    let (session, _) = session_with(vec![series]);

    let mut hosts: Vec<HostLoad> = Vec::new();
    session
        .query_into("select host, load from system", &mut hosts, &[])
        .await
        .unwrap();

    assert_eq!(
        hosts,
        vec![
            HostLoad { host: "a".into(), load: 0.5 },
            HostLoad { host: "b".into(), load: 1.5 },
        ]
    );
}

#[tokio::test]
async fn query_into_empty_result_is_a_no_op() {
    let (session, _) = session_with(Vec::new());

    let mut one = HostLoad { host: "kept".into(), load: 9.0 };
    session.query_into("select * from system", &mut one, &[]).await.unwrap();
    assert_eq!(one.host, "kept");
}

#[tokio::test]
async fn insert_encodes_and_writes_one_point() {
    let (session, writer) = session_with(Vec::new());

    let weather = Weather {
        time: Utc.with_ymd_and_hms(2021, 7, 1, 0, 0, 0).unwrap(),
        city: "berlin".into(),
        temperature: 21.5,
    };
    session.insert(&weather).await.unwrap();

    let points = writer.points.lock().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].measurement, "weather");
    assert_eq!(points[0].tags.get("city").map(String::as_str), Some("berlin"));
    assert_eq!(points[0].fields.get("temperature"), Some(&Value::Float(21.5)));
    assert_eq!(points[0].timestamp, weather.time);
}

#![allow(dead_code)]

use rowbind_store::record;

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct WebPage {
        pub url: String,
        pub visits: i64,
        pub rate: f64,
        pub closed: bool,
        pub title: Option<String>,
    }
    key = url
}

impl WebPage {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            visits: 0,
            rate: 0.0,
            closed: false,
            title: None,
        }
    }
}

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct HogeMoge {
        pub a: String,
        pub b: i64,
        pub c: Option<bool>,
    }
    key = a
}

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct AuditEntry {
        pub message: String,
        pub level: i32,
    }
}

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Counter {
        pub id: i64,
        pub hits: i64,
    }
    key = id
}

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Label {
        pub name: String,
    }
    key = name
}

use std::fmt::Display;

/// Sort direction for `order=` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// A single filter usable inside an `or=(...)` group.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, String),
    IMatch(String, String),
}

impl Condition {
    pub fn eq(column: &str, value: impl Display) -> Self {
        Condition::Eq(column.to_string(), value.to_string())
    }

    pub fn imatch(column: &str, pattern: impl Into<String>) -> Self {
        Condition::IMatch(column.to_string(), pattern.into())
    }

    fn render(&self) -> String {
        match self {
            Condition::Eq(column, value) => format!("{}.eq.{}", column, quote(value)),
            Condition::IMatch(column, pattern) => format!("{}.imatch.{}", column, quote(pattern)),
        }
    }
}

/// Values inside logical groups are double-quoted so reserved characters
/// (`,` `.` `:` `(` `)`) are taken literally.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Builder for PostgREST table paths, e.g.
/// `/rest/v1/doctors?organizationEmail=eq.a%40b.com&order=createdAt.desc`.
#[derive(Debug, Clone)]
pub struct Query {
    table: String,
    params: Vec<(String, String)>,
}

impl Query {
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_string(),
            params: Vec::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns)
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    /// Case-insensitive POSIX regular expression match.
    pub fn imatch(self, column: &str, pattern: &str) -> Self {
        self.filter(column, "imatch", pattern)
    }

    /// Array column contains every listed element.
    pub fn contains(self, column: &str, values: &[&str]) -> Self {
        let items: Vec<String> = values.iter().map(|v| quote(v)).collect();
        self.param(column, &format!("cs.{{{}}}", items.join(",")))
    }

    pub fn not_null(self, column: &str) -> Self {
        self.param(column, "not.is.null")
    }

    /// Rows matching at least one condition. An empty list adds nothing.
    pub fn any_of(self, conditions: &[Condition]) -> Self {
        if conditions.is_empty() {
            return self;
        }
        let group: Vec<String> = conditions.iter().map(Condition::render).collect();
        self.param("or", &format!("({})", group.join(",")))
    }

    pub fn order(self, column: &str, order: Order) -> Self {
        self.param("order", &format!("{}.{}", column, order.as_str()))
    }

    pub fn limit(self, limit: usize) -> Self {
        self.param("limit", &limit.to_string())
    }

    fn filter(self, column: &str, op: &str, value: impl Display) -> Self {
        self.param(column, &format!("{}.{}", op, value))
    }

    fn param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn to_path(&self) -> String {
        let base = format!("/rest/v1/{}", self.table);
        if self.params.is_empty() {
            return base;
        }

        let query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();

        format!("{}?{}", base, query.join("&"))
    }
}

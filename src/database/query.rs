/// Query-string builder for the table API (`col=eq.value`, `order=col.desc`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    params: Vec<(String, String)>,
}

impl TableQuery {
    pub fn new() -> Self {
        TableQuery {
            params: vec![("select".to_string(), "*".to_string())],
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.retain(|(k, _)| k != "select");
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "lt", value)
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.params.push(("order".to_string(), format!("{}.{}", column, dir)));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.params.retain(|(k, _)| k != "limit");
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    fn filter(mut self, column: &str, op: &str, value: impl ToString) -> Self {
        self.params
            .push((column.to_string(), format!("{}.{}", op, value.to_string())));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

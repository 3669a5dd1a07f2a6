use crate::filter::{BoundParameter, ParamValue};
use crate::statement::Dialect;

/// Per-composition bookkeeping: the running parameter counter and the values
/// bound so far. One context exists per compose call and is never shared, so
/// concurrent compositions cannot collide on parameter names.
#[derive(Debug)]
pub struct CompositionContext {
    dialect: Dialect,
    params: Vec<BoundParameter>,
}

impl CompositionContext {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect, params: vec![] }
    }

    /// Bind a value under the next statement-unique name and return the
    /// placeholder text to splice into the predicate.
    pub fn bind(&mut self, value: ParamValue) -> String {
        let name = format!("wPar{}", self.params.len());
        let placeholder = self.dialect.placeholder(&name);
        self.params.push(BoundParameter { name, value });
        placeholder
    }

    pub fn params(&self) -> &[BoundParameter] {
        &self.params
    }

    pub fn into_params(self) -> Vec<BoundParameter> {
        self.params
    }
}

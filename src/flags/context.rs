//! Parsed-command contexts.
//!
//! One [`ParamContext`] holds the parameters a single command level produced,
//! with a parent link back to the context of the command that invoked it.
//! Flag resolution walks this chain iteratively from the innermost context
//! outward.

use crate::flags::value::FlagValue;

/// Where a parsed parameter value originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// Explicitly supplied on the command line.
    CommandLine,
    /// Supplied through the parameter's environment variable.
    Environment,
    /// Filled in from the parameter's built-in default.
    Default,
}

impl ParamSource {
    /// Default-assigned parameters are the ones user configuration may
    /// still override.
    pub fn is_default(self) -> bool {
        matches!(self, ParamSource::Default)
    }
}

/// One parameter recorded by a parsing context.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub value: FlagValue,
    pub source: ParamSource,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<FlagValue>, source: ParamSource) -> Self {
        Param {
            name: name.into(),
            value: value.into(),
            source,
        }
    }
}

/// The parameters one command level produced, linked to its parent command.
#[derive(Debug, Clone)]
pub struct ParamContext {
    command: String,
    invoked_subcommand: Option<String>,
    params: Vec<Param>,
    parent: Option<Box<ParamContext>>,
}

impl ParamContext {
    pub fn new(command: impl Into<String>) -> Self {
        ParamContext {
            command: command.into(),
            invoked_subcommand: None,
            params: Vec::new(),
            parent: None,
        }
    }

    pub fn push(&mut self, param: Param) {
        self.params.push(param);
    }

    pub fn with_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<FlagValue>,
        source: ParamSource,
    ) -> Self {
        self.push(Param::new(name, value, source));
        self
    }

    pub fn with_invoked_subcommand(mut self, name: impl Into<String>) -> Self {
        self.invoked_subcommand = Some(name.into());
        self
    }

    pub fn with_parent(mut self, parent: ParamContext) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn invoked(&self) -> Option<&str> {
        self.invoked_subcommand.as_deref()
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn parent(&self) -> Option<&ParamContext> {
        self.parent.as_deref()
    }
}

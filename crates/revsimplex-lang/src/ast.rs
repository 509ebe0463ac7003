use crate::lexer::Span;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub assignments: Vec<Assignment>,
}

/// `name = value`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub span: Span,
    pub name: String,
    pub value: Value,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number { span: Span, value: f64 },
    List { span: Span, items: Vec<Value> },
}

impl Value {
    pub fn span(&self) -> Span {
        match self {
            Value::Number { span, .. } | Value::List { span, .. } => *span,
        }
    }

    /// Nesting depth: 0 for a number, 1 for a flat list.
    ///
    /// An empty list counts as depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Value::Number { .. } => 0,
            Value::List { items, .. } => 1 + items.iter().map(Value::depth).max().unwrap_or(0),
        }
    }
}

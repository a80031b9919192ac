use std::{fmt, rc::Rc};

use crate::{
    runtime::{
        error::{ErrorKind, FlexError},
        value::{FunctionBody, Value},
    },
    syntax::{
        grammar::{Token, classify_token},
        literal::{self, Literal},
        shape::{Shape, classify},
    },
};

/// One step of a program, classified when the program is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Scalar literal (boolean, number, null, function) pushed as written.
    Value(Value),
    /// Text, array, dict or absent literal, materialized when reached.
    Structured(Literal),
    /// Grammar token; `text` is the token as written.
    Token { text: Rc<str>, token: Token },
    /// Raises `error` when reached.
    Invalid { literal: Literal, error: FlexError },
}

impl Instruction {
    pub fn from_literal(literal: &Literal) -> Self {
        match classify(literal) {
            Shape::Instr => {
                let text = literal.as_str().unwrap_or_default();
                match classify_token(text) {
                    Ok(token) => Instruction::Token {
                        text: text.into(),
                        token,
                    },
                    Err(error) => Instruction::Invalid {
                        literal: literal.clone(),
                        error,
                    },
                }
            }
            shape if shape.is_structured_literal() => Instruction::Structured(literal.clone()),
            shape if shape.is_scalar_literal() => match scalar_value(literal) {
                Some(value) => Instruction::Value(value),
                None => Instruction::unknown(literal),
            },
            _ => Instruction::unknown(literal),
        }
    }

    /// Builds a token instruction, classifying `text`.
    pub fn token(text: &str) -> Self {
        Instruction::from_literal(&Literal::String(text.to_string()))
    }

    fn unknown(literal: &Literal) -> Self {
        Instruction::Invalid {
            literal: literal.clone(),
            error: FlexError::new(
                ErrorKind::UnknownType,
                format!("Unknown type: `{}'", literal::render(literal)),
            ),
        }
    }

    pub fn to_literal(&self) -> Literal {
        match self {
            Instruction::Value(value) => value.to_literal(),
            Instruction::Structured(literal) => literal.clone(),
            Instruction::Token { text, .. } => Literal::String(text.to_string()),
            Instruction::Invalid { literal, .. } => literal.clone(),
        }
    }

    /// The instruction as written, used to annotate errors.
    pub fn text(&self) -> String {
        match self {
            Instruction::Token { text, .. } => text.to_string(),
            Instruction::Structured(literal) | Instruction::Invalid { literal, .. } => {
                literal::render(literal)
            }
            Instruction::Value(value) => literal::render(&value.to_literal()),
        }
    }

    /// Short classification label, as listed by `flex tokens`.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Instruction::Value(value) => value.shape().as_str(),
            Instruction::Structured(literal) => classify(literal).as_str(),
            Instruction::Token { token, .. } => token.kind_label(),
            Instruction::Invalid { .. } => "invalid",
        }
    }
}

fn scalar_value(literal: &Literal) -> Option<Value> {
    match literal {
        Literal::Bool(b) => Some(Value::Boolean(*b)),
        Literal::Number(n) => n.as_f64().map(Value::Number),
        Literal::Array(items) => Some(Value::Function(FunctionBody::Program(
            Program::from_items(items),
        ))),
        _ => None,
    }
}

/// Immutable, cheaply clonable instruction sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    instructions: Rc<[Instruction]>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions: instructions.into(),
        }
    }

    fn from_items(items: &[Literal]) -> Self {
        Self::new(items.iter().map(Instruction::from_literal).collect())
    }

    /// Builds a program from a decoded instruction sequence.
    pub fn from_literal(literal: &Literal) -> Result<Self, FlexError> {
        match literal {
            Literal::Array(items) => Ok(Self::from_items(items)),
            other => Err(FlexError::new(
                ErrorKind::MalformedInstruction,
                format!(
                    "expected an instruction sequence, got `{}'",
                    literal::render(other)
                ),
            )),
        }
    }

    /// Decodes JSON source and builds a program from it.
    pub fn parse(source: &str) -> Result<Self, FlexError> {
        Self::from_literal(&literal::decode(source)?)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn to_literal(&self) -> Literal {
        Literal::Array(self.instructions.iter().map(Instruction::to_literal).collect())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_literal())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::syntax::grammar::ControlOp;

    #[test]
    fn builds_each_instruction_kind() {
        let program = Program::from_literal(&json!([
            1,
            true,
            null,
            ["text"],
            {"@": [1]},
            "$x",
            "#put",
            ["$x", "#put"],
            "Bad!",
            {"x": 1}
        ]))
        .unwrap();

        let labels: Vec<&str> = program.instructions().iter().map(Instruction::kind_label).collect();
        assert_eq!(
            labels,
            [
                "number", "boolean", "js-null", "string", "array", "push", "control", "function",
                "invalid", "invalid"
            ]
        );
        assert!(matches!(
            &program.instructions()[6],
            Instruction::Token {
                token: Token::Control(ControlOp::Put),
                ..
            }
        ));
    }

    #[test]
    fn invalid_instructions_keep_their_error() {
        let program = Program::from_literal(&json!(["Bad!", {"x": 1}])).unwrap();
        match &program.instructions()[0] {
            Instruction::Invalid { error, .. } => {
                assert_eq!(error.kind(), ErrorKind::MalformedInstruction)
            }
            other => panic!("expected invalid instruction, got {:?}", other),
        }
        match &program.instructions()[1] {
            Instruction::Invalid { error, .. } => assert_eq!(error.kind(), ErrorKind::UnknownType),
            other => panic!("expected invalid instruction, got {:?}", other),
        }
    }

    #[test]
    fn non_sequence_is_rejected() {
        let err = Program::from_literal(&json!({"@": []})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInstruction);
    }

    #[test]
    fn literal_round_trips_through_program() {
        let source = json!([3, 4, "-", ["hi"], {"!": {"a": "$x"}}, ["$y", "#put"]]);
        let program = Program::from_literal(&source).unwrap();
        assert_eq!(program.to_literal(), source);
        assert_eq!(program.instructions()[2].text(), "-");
    }

    #[test]
    fn parse_decodes_json() {
        let program = Program::parse(r#"[1, 2, "+"]"#).unwrap();
        assert_eq!(program.len(), 3);
        assert!(Program::parse("[1,").is_err());
    }
}

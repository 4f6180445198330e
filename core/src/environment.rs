use fnv::FnvHashMap;

use crate::{token::Token, types::Value};

/// The variable store for one program run.
///
/// A single flat frame: `define` always succeeds and silently shadows any
/// prior binding, while `get`/`assign` require the name to exist already.
/// Callers turn a miss into an undefined-variable runtime error.
#[derive(Default)]
pub struct Environment {
    values: FnvHashMap<String, Value>,
}

impl Environment {
    pub fn define(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &Token) -> Option<Value> {
        self.values.get(&name.lexeme).cloned()
    }

    pub fn assign(&mut self, name: &Token, new_value: Value) -> bool {
        match self.values.get_mut(&name.lexeme) {
            Some(value) => {
                *value = new_value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn name(lexeme: &str) -> Token {
        Token::new(TokenType::Identifier, lexeme.to_string(), None, 1)
    }

    #[test]
    fn define_then_get() {
        let mut environment = Environment::default();
        environment.define("x".to_string(), Value::Number(1.0));
        assert_eq!(environment.get(&name("x")), Some(Value::Number(1.0)));
    }

    #[test]
    fn get_of_undefined_name_is_none() {
        let environment = Environment::default();
        assert_eq!(environment.get(&name("missing")), None);
    }

    #[test]
    fn redefine_overwrites() {
        let mut environment = Environment::default();
        environment.define("x".to_string(), Value::Number(1.0));
        environment.define("x".to_string(), Value::Number(2.0));
        assert_eq!(environment.get(&name("x")), Some(Value::Number(2.0)));
    }

    #[test]
    fn assign_requires_an_existing_binding() {
        let mut environment = Environment::default();
        assert!(!environment.assign(&name("x"), Value::Number(1.0)));

        environment.define("x".to_string(), Value::Nil);
        assert!(environment.assign(&name("x"), Value::Number(1.0)));
        assert_eq!(environment.get(&name("x")), Some(Value::Number(1.0)));
    }
}

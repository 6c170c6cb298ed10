//! Tree-walking evaluation of a parsed handler body.

use core::cell::RefCell;

use js::{
    DomString, JSError, JSValue, PreferredType, PropertyKey, to_boolean, to_number, to_primitive,
    to_string,
};

use crate::script::parser::{
    BinaryOperator, Expression, Literal, MemberProperty, Program, Statement, UnaryOperator,
};
use crate::script::scope::ScopeChain;

enum Completion {
    Normal,
    Return(JSValue),
}

/// One activation of a compiled handler.
struct Frame<'chain> {
    chain: &'chain ScopeChain,
    this: JSValue,
    /// The `event` parameter, the only function-local binding.
    event: RefCell<JSValue>,
}

/// Run `program` as the body of `function (event)` with receiver `this`.
pub fn run(program: &Program, chain: &ScopeChain, this: &JSValue, event: JSValue) -> Result<JSValue, JSError> {
    let frame = Frame {
        chain,
        this: this.clone(),
        event: RefCell::new(event),
    };
    for statement in &program.body {
        if let Completion::Return(value) = frame.execute(statement)? {
            return Ok(value);
        }
    }
    Ok(JSValue::Undefined)
}

fn to_property_key(value: &JSValue) -> Result<PropertyKey, JSError> {
    match to_primitive(value, PreferredType::String)? {
        JSValue::Symbol(symbol) => Ok(PropertyKey::Symbol(symbol)),
        primitive => Ok(PropertyKey::String(to_string(&primitive)?)),
    }
}

impl Frame<'_> {
    fn execute(&self, statement: &Statement) -> Result<Completion, JSError> {
        match statement {
            Statement::Empty => Ok(Completion::Normal),
            Statement::Expression(expression) => {
                self.evaluate(expression)?;
                Ok(Completion::Normal)
            }
            Statement::Return(value) => {
                let result = match value {
                    Some(expression) => self.evaluate(expression)?,
                    None => JSValue::Undefined,
                };
                Ok(Completion::Return(result))
            }
            Statement::Throw(expression) => Err(JSError::Exception(self.evaluate(expression)?)),
            Statement::If {
                test,
                consequent,
                alternate,
            } => {
                if to_boolean(&self.evaluate(test)?) {
                    self.execute(consequent)
                } else if let Some(otherwise) = alternate {
                    self.execute(otherwise)
                } else {
                    Ok(Completion::Normal)
                }
            }
            Statement::Block(body) => {
                for inner in body {
                    if let Completion::Return(value) = self.execute(inner)? {
                        return Ok(Completion::Return(value));
                    }
                }
                Ok(Completion::Normal)
            }
        }
    }

    fn identifier(&self, name: &str) -> Result<(JSValue, JSValue), JSError> {
        if name == "event" {
            return Ok((self.event.borrow().clone(), JSValue::Undefined));
        }
        self.chain.lookup(name)
    }

    /// Evaluate the base and key of a member expression.
    fn member_base(&self, object: &Expression, property: &MemberProperty) -> Result<(JSValue, PropertyKey), JSError> {
        let base = self.evaluate(object)?;
        let key = match property {
            MemberProperty::Named(name) => PropertyKey::from(name.as_str()),
            MemberProperty::Computed(expression) => to_property_key(&self.evaluate(expression)?)?,
        };
        if base.is_nullish() {
            let shown = match &key {
                PropertyKey::String(text) => text.to_rust_string_lossy(),
                PropertyKey::Symbol(symbol) => symbol.descriptive_string(),
            };
            return Err(JSError::type_error(format!(
                "Cannot read properties of {} (reading '{shown}')",
                base.debug_string()
            )));
        }
        Ok((base, key))
    }

    fn get_property(base: &JSValue, key: PropertyKey) -> JSValue {
        match base {
            JSValue::Object(object) => object.get(key),
            JSValue::String(text) if key == PropertyKey::from("length") => {
                JSValue::from(u32::try_from(text.len()).unwrap_or(u32::MAX))
            }
            _ => JSValue::Undefined,
        }
    }

    /// Evaluate a callee, producing the function value and its receiver.
    fn callee(&self, callee: &Expression) -> Result<(JSValue, JSValue), JSError> {
        match callee {
            Expression::Identifier(name) => self.identifier(name),
            Expression::Member { object, property } => {
                let (base, key) = self.member_base(object, property)?;
                Ok((Self::get_property(&base, key), base))
            }
            other => Ok((self.evaluate(other)?, JSValue::Undefined)),
        }
    }

    fn assign(&self, target: &Expression, value: JSValue) -> Result<(), JSError> {
        match target {
            Expression::Identifier(name) if name == "event" => {
                *self.event.borrow_mut() = value;
                Ok(())
            }
            Expression::Identifier(name) => {
                self.chain.assign(name, value);
                Ok(())
            }
            Expression::Member { object, property } => {
                let (base, key) = self.member_base(object, property)?;
                if let JSValue::Object(receiver) = base {
                    receiver.set(key, value);
                }
                Ok(())
            }
            _ => Err(JSError::SyntaxError(String::from("Invalid left-hand side in assignment"))),
        }
    }

    fn add(left: &JSValue, right: &JSValue) -> Result<JSValue, JSError> {
        let left = to_primitive(left, PreferredType::Default)?;
        let right = to_primitive(right, PreferredType::Default)?;
        if matches!(left, JSValue::String(_)) || matches!(right, JSValue::String(_)) {
            let mut joined = to_string(&left)?;
            joined.append(&to_string(&right)?);
            return Ok(JSValue::String(joined));
        }
        match (&left, &right) {
            (JSValue::BigInt(augend), JSValue::BigInt(addend)) => Ok(JSValue::BigInt(augend + addend)),
            (JSValue::BigInt(_), _) | (_, JSValue::BigInt(_)) => Err(JSError::type_error(
                "Cannot mix BigInt and other types, use explicit conversions",
            )),
            _ => Ok(JSValue::Number(to_number(&left)? + to_number(&right)?)),
        }
    }

    fn evaluate(&self, expression: &Expression) -> Result<JSValue, JSError> {
        match expression {
            Expression::Literal(literal) => Ok(match literal {
                Literal::Number(value) => JSValue::Number(*value),
                Literal::String(text) => JSValue::String(DomString::from(text.as_str())),
                Literal::Boolean(value) => JSValue::Boolean(*value),
                Literal::Null => JSValue::Null,
                Literal::Undefined => JSValue::Undefined,
            }),
            Expression::Identifier(name) => Ok(self.identifier(name)?.0),
            Expression::This => Ok(self.this.clone()),
            Expression::Member { object, property } => {
                let (base, key) = self.member_base(object, property)?;
                Ok(Self::get_property(&base, key))
            }
            Expression::Call { callee, arguments } => {
                let (function, receiver) = self.callee(callee)?;
                let values = arguments
                    .iter()
                    .map(|argument| self.evaluate(argument))
                    .collect::<Result<Vec<_>, _>>()?;
                match function {
                    JSValue::Object(object) if object.is_callable() => object.call(&receiver, &values),
                    other => Err(JSError::type_error(format!(
                        "{} is not a function",
                        other.debug_string()
                    ))),
                }
            }
            Expression::Unary { operator, operand } => match operator {
                UnaryOperator::Not => Ok(JSValue::Boolean(!to_boolean(&self.evaluate(operand)?))),
                UnaryOperator::Negate => match to_primitive(&self.evaluate(operand)?, PreferredType::Number)? {
                    JSValue::BigInt(value) => Ok(JSValue::BigInt(-value)),
                    primitive => Ok(JSValue::Number(-to_number(&primitive)?)),
                },
                UnaryOperator::TypeOf => {
                    if let Expression::Identifier(name) = operand.as_ref()
                        && name != "event"
                        && self.chain.resolve(name).is_none()
                    {
                        return Ok(JSValue::string("undefined"));
                    }
                    Ok(JSValue::string(self.evaluate(operand)?.type_of()))
                }
            },
            Expression::Binary { operator, left, right } => match operator {
                BinaryOperator::And => {
                    let value = self.evaluate(left)?;
                    if to_boolean(&value) { self.evaluate(right) } else { Ok(value) }
                }
                BinaryOperator::Or => {
                    let value = self.evaluate(left)?;
                    if to_boolean(&value) { Ok(value) } else { self.evaluate(right) }
                }
                BinaryOperator::Add => Self::add(&self.evaluate(left)?, &self.evaluate(right)?),
                BinaryOperator::Subtract => {
                    let minuend = to_number(&self.evaluate(left)?)?;
                    let subtrahend = to_number(&self.evaluate(right)?)?;
                    Ok(JSValue::Number(minuend - subtrahend))
                }
                BinaryOperator::StrictEquals => Ok(JSValue::Boolean(self.evaluate(left)? == self.evaluate(right)?)),
                BinaryOperator::StrictNotEquals => {
                    Ok(JSValue::Boolean(self.evaluate(left)? != self.evaluate(right)?))
                }
            },
            Expression::Assign { target, value } => {
                let assigned = self.evaluate(value)?;
                self.assign(target, assigned.clone())?;
                Ok(assigned)
            }
        }
    }
}

//! Minimal class / instance support.
//!
//! A class declaration becomes a [`ClassInfo`]; its constructor is an
//! ordinary [`NativeFunction`] bound under the class name, so instantiation
//! goes through the same dispatcher as every other call.  Instances carry
//! data only: there is no method lookup and no inheritance.

use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;
use log::debug;

use crate::error::{LangError, Result};
use crate::value::{NativeFunction, Value};

#[derive(Debug)]
pub struct ClassInfo {
    name: String,
    fields: Vec<String>,
}

impl ClassInfo {
    /// Validate the declaration.  Duplicate field names are rejected here,
    /// at definition time, never at instantiation time.
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Result<Rc<Self>> {
        let name: String = name.into();

        let mut seen: HashSet<&str> = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.as_str()) {
                return Err(LangError::definition(format!(
                    "class {} declares field '{}' more than once",
                    name, field
                )));
            }
        }

        debug!("Class '{}' declared with fields {:?}", name, fields);

        Ok(Rc::new(Self { name, fields }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Build an instance, pairing each declared field with the argument at
    /// the same position.
    pub fn make_instance(self: &Rc<Self>, args: &[Value]) -> Result<Value> {
        if args.len() != self.fields.len() {
            return Err(LangError::arity(
                format!("constructor {}", self.name),
                self.fields.len(),
                args.len(),
            ));
        }

        let fields: IndexMap<String, Value> = self
            .fields
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect();

        debug!("Instantiated '{}' with {} fields", self.name, fields.len());

        Ok(Value::Instance(Rc::new(Instance {
            class: Rc::clone(self),
            fields,
        })))
    }

    /// The native function bound under the class name.
    pub fn constructor(self: &Rc<Self>) -> NativeFunction {
        let class: Rc<ClassInfo> = Rc::clone(self);

        NativeFunction::new(self.name.as_str(), move |args: &[Value]| {
            class.make_instance(args)
        })
    }
}

#[derive(Debug)]
pub struct Instance {
    class: Rc<ClassInfo>,
    fields: IndexMap<String, Value>,
}

impl Instance {
    pub fn class(&self) -> &Rc<ClassInfo> {
        &self.class
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

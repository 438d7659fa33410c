//! Value to bytes, driven by a `WireType`.

use std::collections::{HashMap, VecDeque};

use argo_core::{FieldError, PathSegment, Value, display_path};
use argo_wire::label::{ABSENT, ERROR, NON_NULL, NULL};
use argo_wire::{DescTag, Field, Label, ScalarKind, WireType};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::EncodeError;
use crate::options::CodecOptions;
use crate::scope::Scope;

/// State of one encode call that spans all scopes.
pub(crate) struct Encoder<'e> {
    options: CodecOptions,
    errors: &'e [FieldError],
    /// Error indices waiting for a null at their path, in list order.
    pending: HashMap<&'e [PathSegment], VecDeque<usize>>,
    attached: Vec<bool>,
    path: Vec<PathSegment>,
    depth: usize,
}

impl<'e> Encoder<'e> {
    pub fn new(options: CodecOptions, errors: &'e [FieldError]) -> Self {
        let mut pending: HashMap<&[PathSegment], VecDeque<usize>> = HashMap::new();
        for (index, error) in errors.iter().enumerate() {
            if !error.path.is_empty() {
                pending.entry(&error.path).or_default().push_back(index);
            }
        }
        Self {
            options,
            errors,
            pending,
            attached: vec![false; errors.len()],
            path: Vec::new(),
            depth: 0,
        }
    }

    /// Errors that were not written inline, in list order.
    pub fn unattached(&self) -> Vec<usize> {
        (0..self.errors.len()).filter(|&i| !self.attached[i]).collect()
    }

    fn mismatch(&self, expected: &'static str, found: &Value) -> EncodeError {
        EncodeError::Mismatch {
            path: display_path(&self.path),
            expected,
            found: found.kind_name(),
        }
    }

    fn enter(&mut self) -> Result<(), EncodeError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(EncodeError::DepthLimit(self.options.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Claim the first pending error at the current path.
    fn take_error(&mut self) -> Option<usize> {
        let queue = self.pending.get_mut(self.path.as_slice())?;
        let index = queue.pop_front()?;
        self.attached[index] = true;
        Some(index)
    }

    fn has_error_here(&self) -> bool {
        self.pending
            .get(self.path.as_slice())
            .is_some_and(|queue| !queue.is_empty())
    }

    pub fn value(&mut self, out: &mut Scope, ty: &WireType, value: &Value) -> Result<(), EncodeError> {
        match ty {
            WireType::Scalar(kind) => self.scalar(out, *kind, value),
            WireType::Nullable(inner) => {
                if value.is_null() {
                    return match self.take_error() {
                        Some(index) => self.inline_error(out, index),
                        None => {
                            out.buf.write_varint(NULL);
                            Ok(())
                        }
                    };
                }
                if !inner.is_labeled() {
                    out.buf.write_varint(NON_NULL);
                }
                self.value(out, inner, value)
            }
            WireType::Record(fields) => {
                let Value::Object(map) = value else {
                    return Err(self.mismatch("RECORD", value));
                };
                if let Some(extra) = map.keys().find(|k| !fields.iter().any(|f| &f.name == *k)) {
                    return Err(EncodeError::UnexpectedField {
                        path: display_path(&self.path),
                        field: extra.clone(),
                    });
                }
                self.enter()?;
                for field in fields {
                    self.path.push(PathSegment::Key(field.name.clone()));
                    self.field(out, field, map.get(&field.name))?;
                    self.path.pop();
                }
                self.leave();
                Ok(())
            }
            WireType::Array(element) => {
                let Value::List(items) = value else {
                    return Err(self.mismatch("ARRAY", value));
                };
                self.enter()?;
                out.buf.write_varint(items.len() as i64);
                for (i, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(i));
                    self.value(out, element, item)?;
                    self.path.pop();
                }
                self.leave();
                Ok(())
            }
            WireType::Block(inner) => self.block(out, |enc, scope| enc.value(scope, inner, value)),
            WireType::SelfDescribing => self.desc(out, value),
        }
    }

    fn field(&mut self, out: &mut Scope, field: &Field, value: Option<&Value>) -> Result<(), EncodeError> {
        match value {
            Some(value) => {
                if field.omittable && !field.of.is_labeled() {
                    out.buf.write_varint(NON_NULL);
                }
                self.value(out, &field.of, value)
            }
            // a missing nullable field that failed upstream
            None if field.of.is_nullable() && self.has_error_here() => {
                self.value(out, &field.of, &Value::Null)
            }
            None if field.omittable => {
                out.buf.write_varint(ABSENT);
                Ok(())
            }
            None => Err(EncodeError::MissingField {
                path: display_path(&self.path),
            }),
        }
    }

    fn scalar(&mut self, out: &mut Scope, kind: ScalarKind, value: &Value) -> Result<(), EncodeError> {
        match (kind, value) {
            (ScalarKind::String | ScalarKind::Id, Value::String(s)) => {
                self.text(out, kind, s);
                Ok(())
            }
            (ScalarKind::Bytes, Value::Bytes(b)) => {
                self.bytes(out, b);
                Ok(())
            }
            (ScalarKind::Bytes, Value::String(s)) => {
                let decoded = STANDARD.decode(s).map_err(|_| EncodeError::InvalidBytes {
                    path: display_path(&self.path),
                })?;
                self.bytes(out, &decoded);
                Ok(())
            }
            (ScalarKind::Int32, Value::Int(n)) => {
                if i32::try_from(*n).is_err() {
                    return Err(EncodeError::OutOfRange {
                        path: display_path(&self.path),
                        value: *n,
                    });
                }
                out.buf.write_varint(*n);
                Ok(())
            }
            (ScalarKind::Int64, Value::Int(n)) => {
                out.buf.write_varint(*n);
                Ok(())
            }
            (ScalarKind::Float64, Value::Float(f)) => {
                out.buf.write_raw_bytes(&f.to_le_bytes());
                Ok(())
            }
            (ScalarKind::Float64, Value::Int(n)) => {
                out.buf.write_raw_bytes(&(*n as f64).to_le_bytes());
                Ok(())
            }
            (ScalarKind::Boolean, Value::Bool(b)) => {
                out.buf.write_varint(i64::from(*b));
                Ok(())
            }
            (kind, other) => Err(self.mismatch(kind.name(), other)),
        }
    }

    fn text(&mut self, out: &mut Scope, kind: ScalarKind, s: &str) {
        if self.options.deduplicate {
            let (id, fresh) = out.dicts.text(kind).intern(s);
            if !fresh {
                out.buf.write_varint(Label::backref(id.as_u32()));
                return;
            }
        }
        out.buf.write_varint(s.len() as i64);
        out.buf.write_raw_bytes(s.as_bytes());
    }

    fn bytes(&mut self, out: &mut Scope, b: &[u8]) {
        if self.options.deduplicate {
            let (id, fresh) = out.dicts.bytes.intern(b);
            if !fresh {
                out.buf.write_varint(Label::backref(id.as_u32()));
                return;
            }
        }
        out.buf.write_varint(b.len() as i64);
        out.buf.write_raw_bytes(b);
    }

    /// Self-describing value: tag, then payload.
    pub fn desc(&mut self, out: &mut Scope, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => out.buf.write_varint(DescTag::Null.to_i64()),
            Value::Bool(false) => out.buf.write_varint(DescTag::False.to_i64()),
            Value::Bool(true) => out.buf.write_varint(DescTag::True.to_i64()),
            Value::Int(n) => {
                out.buf.write_varint(DescTag::Int.to_i64());
                out.buf.write_varint(*n);
            }
            Value::Float(f) => {
                out.buf.write_varint(DescTag::Float.to_i64());
                out.buf.write_raw_bytes(&f.to_le_bytes());
            }
            Value::String(s) => {
                out.buf.write_varint(DescTag::String.to_i64());
                self.text(out, ScalarKind::String, s);
            }
            Value::Bytes(b) => {
                out.buf.write_varint(DescTag::Bytes.to_i64());
                self.bytes(out, b);
            }
            Value::List(items) => {
                self.enter()?;
                out.buf.write_varint(DescTag::List.to_i64());
                out.buf.write_varint(items.len() as i64);
                for item in items {
                    self.desc(out, item)?;
                }
                self.leave();
            }
            Value::Object(map) => {
                self.enter()?;
                out.buf.write_varint(DescTag::Object.to_i64());
                out.buf.write_varint(map.len() as i64);
                for (key, item) in map {
                    self.text(out, ScalarKind::String, key);
                    self.desc(out, item)?;
                }
                self.leave();
            }
        }
        Ok(())
    }

    /// Encode into a fresh scope stored as a block of `out`, and reference it.
    pub fn block<F>(&mut self, out: &mut Scope, f: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self, &mut Scope) -> Result<(), EncodeError>,
    {
        let mut inner = Scope::writer();
        f(self, &mut inner)?;
        let bytes = inner.finish()?;
        let handle = out.buf.begin_block();
        out.buf.write_to_block(handle, &bytes)?;
        out.buf.write_block_ref(handle)?;
        Ok(())
    }

    /// Block payload of a field error: its list index, then the error object.
    pub fn error_block(&mut self, out: &mut Scope, index: usize) -> Result<(), EncodeError> {
        let error = self.errors[index].to_value();
        self.block(out, |enc, scope| {
            scope.buf.write_varint(index as i64);
            enc.desc(scope, &error)
        })
    }

    fn inline_error(&mut self, out: &mut Scope, index: usize) -> Result<(), EncodeError> {
        out.buf.write_varint(ERROR);
        self.error_block(out, index)
    }
}

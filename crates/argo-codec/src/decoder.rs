//! Bytes to value, mirroring `encoder`.

use argo_core::{FieldError, IndexMap, Value};
use argo_wire::label::{ABSENT, ERROR, NON_NULL, NULL};
use argo_wire::{DescTag, Label, ScalarKind, WireType};

use crate::error::DecodeError;
use crate::options::CodecOptions;
use crate::scope::{Scope, dictionary_name, resolve_backref};

/// State of one decode call that spans all scopes.
pub(crate) struct Decoder {
    options: CodecOptions,
    /// Whether literals are recorded for back-references (from the header).
    dedup: bool,
    /// Field errors found so far, with their original list index.
    errors: Vec<(u64, FieldError)>,
    depth: usize,
}

impl Decoder {
    pub fn new(options: CodecOptions, dedup: bool) -> Self {
        Self {
            options,
            dedup,
            errors: Vec::new(),
            depth: 0,
        }
    }

    /// Collected errors restored to their original order.
    pub fn into_errors(mut self) -> Vec<FieldError> {
        self.errors.sort_by_key(|(index, _)| *index);
        self.errors.into_iter().map(|(_, e)| e).collect()
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(DecodeError::DepthLimit(self.options.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn expect_label(&self, scope: &mut Scope, label: i64, expected: &'static str) -> Result<(), DecodeError> {
        let offset = scope.buf.position();
        let found = scope.buf.read_varint()?;
        if found != label {
            return Err(DecodeError::UnexpectedLabel {
                expected,
                label: found,
                offset,
            });
        }
        Ok(())
    }

    /// Read a count and check it against the bytes left.
    ///
    /// Every element takes at least `min_size` bytes. Elements that can take
    /// no bytes at all (empty records) are not checked against the budget.
    fn read_count(&self, scope: &mut Scope, min_size: usize) -> Result<usize, DecodeError> {
        let offset = scope.buf.position();
        let raw = scope.buf.read_varint()?;
        let Label::Length(len) = Label::classify(raw) else {
            return Err(DecodeError::UnexpectedLabel {
                expected: "count",
                label: raw,
                offset,
            });
        };
        let remaining = scope.buf.remaining();
        if min_size > 0 && len.saturating_mul(min_size as u64) > remaining as u64 {
            return Err(DecodeError::LengthOverflow { len, remaining });
        }
        usize::try_from(len).map_err(|_| DecodeError::LengthOverflow { len, remaining })
    }

    pub fn value(&mut self, scope: &mut Scope, ty: &WireType) -> Result<Value, DecodeError> {
        match ty {
            WireType::Scalar(kind) => self.scalar(scope, *kind),
            WireType::Nullable(inner) => match scope.buf.peek_varint()? {
                NULL => {
                    scope.buf.read_varint()?;
                    Ok(Value::Null)
                }
                ERROR => {
                    scope.buf.read_varint()?;
                    self.error_block(scope)?;
                    Ok(Value::Null)
                }
                _ => {
                    if !inner.is_labeled() {
                        self.expect_label(scope, NON_NULL, "NON_NULL")?;
                    }
                    self.value(scope, inner)
                }
            },
            WireType::Record(fields) => {
                self.enter()?;
                let mut map = IndexMap::with_capacity(fields.len());
                for field in fields {
                    if field.omittable {
                        if scope.buf.peek_varint()? == ABSENT {
                            scope.buf.read_varint()?;
                            continue;
                        }
                        if !field.of.is_labeled() {
                            self.expect_label(scope, NON_NULL, "NON_NULL")?;
                        }
                    }
                    let value = self.value(scope, &field.of)?;
                    map.insert(field.name.clone(), value);
                }
                self.leave();
                Ok(Value::Object(map))
            }
            WireType::Array(element) => {
                self.enter()?;
                let len = self.read_count(scope, min_size(element))?;
                // a count of zero-size elements is not bounded by the input
                let mut items = Vec::with_capacity(len.min(scope.buf.remaining()));
                for _ in 0..len {
                    items.push(self.value(scope, element)?);
                }
                self.leave();
                Ok(Value::List(items))
            }
            WireType::Block(inner) => {
                let block = scope.buf.read_block_ref()?;
                let mut inner_scope = Scope::reader(scope.buf.block(block)?);
                self.value(&mut inner_scope, inner)
            }
            WireType::SelfDescribing => self.desc(scope),
        }
    }

    fn scalar(&mut self, scope: &mut Scope, kind: ScalarKind) -> Result<Value, DecodeError> {
        match kind {
            ScalarKind::String | ScalarKind::Id => self.text(scope, kind).map(Value::String),
            ScalarKind::Bytes => self.bytes(scope).map(Value::Bytes),
            ScalarKind::Int32 => {
                let n = scope.buf.read_varint()?;
                if i32::try_from(n).is_err() {
                    return Err(DecodeError::OutOfRange(n));
                }
                Ok(Value::Int(n))
            }
            ScalarKind::Int64 => Ok(Value::Int(scope.buf.read_varint()?)),
            ScalarKind::Float64 => read_f64(scope).map(Value::Float),
            ScalarKind::Boolean => {
                let offset = scope.buf.position();
                match scope.buf.read_varint()? {
                    0 => Ok(Value::Bool(false)),
                    1 => Ok(Value::Bool(true)),
                    label => Err(DecodeError::UnexpectedLabel {
                        expected: "BOOLEAN",
                        label,
                        offset,
                    }),
                }
            }
        }
    }

    fn text(&mut self, scope: &mut Scope, kind: ScalarKind) -> Result<String, DecodeError> {
        let offset = scope.buf.position();
        let raw = scope.buf.read_varint()?;
        match Label::classify(raw) {
            Label::Length(len) => {
                let len = checked_len(scope, len)?;
                let bytes = scope.buf.read_raw_bytes(len)?;
                let s = std::str::from_utf8(bytes)
                    .map_err(|_| DecodeError::InvalidUtf8(offset))?
                    .to_owned();
                if self.dedup {
                    scope.dicts.text(kind).push(s.clone());
                }
                Ok(s)
            }
            Label::Backref(id) => resolve_backref(scope.dicts.text(kind), id)
                .cloned()
                .ok_or(DecodeError::DictionaryMiss {
                    kind: dictionary_name(kind),
                    id,
                }),
            _ => Err(DecodeError::UnexpectedLabel {
                expected: dictionary_name(kind),
                label: raw,
                offset,
            }),
        }
    }

    fn bytes(&mut self, scope: &mut Scope) -> Result<Vec<u8>, DecodeError> {
        let offset = scope.buf.position();
        let raw = scope.buf.read_varint()?;
        match Label::classify(raw) {
            Label::Length(len) => {
                let len = checked_len(scope, len)?;
                let bytes = scope.buf.read_raw_bytes(len)?.to_vec();
                if self.dedup {
                    scope.dicts.bytes.push(bytes.clone());
                }
                Ok(bytes)
            }
            Label::Backref(id) => resolve_backref(&scope.dicts.bytes, id)
                .cloned()
                .ok_or(DecodeError::DictionaryMiss { kind: "BYTES", id }),
            _ => Err(DecodeError::UnexpectedLabel {
                expected: "BYTES",
                label: raw,
                offset,
            }),
        }
    }

    pub fn desc(&mut self, scope: &mut Scope) -> Result<Value, DecodeError> {
        let raw = scope.buf.read_varint()?;
        let tag = DescTag::from_i64(raw).ok_or(DecodeError::UnknownTag(raw))?;
        Ok(match tag {
            DescTag::Null => Value::Null,
            DescTag::False => Value::Bool(false),
            DescTag::True => Value::Bool(true),
            DescTag::Int => Value::Int(scope.buf.read_varint()?),
            DescTag::Float => Value::Float(read_f64(scope)?),
            DescTag::String => Value::String(self.text(scope, ScalarKind::String)?),
            DescTag::Bytes => Value::Bytes(self.bytes(scope)?),
            DescTag::List => {
                self.enter()?;
                let len = self.read_count(scope, 1)?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.desc(scope)?);
                }
                self.leave();
                Value::List(items)
            }
            DescTag::Object => {
                self.enter()?;
                let len = self.read_count(scope, 2)?;
                let mut map = IndexMap::with_capacity(len);
                for _ in 0..len {
                    let key = self.text(scope, ScalarKind::String)?;
                    let item = self.desc(scope)?;
                    map.insert(key, item);
                }
                self.leave();
                Value::Object(map)
            }
        })
    }

    /// Read a block reference to an error payload and collect the error.
    pub fn error_block(&mut self, scope: &mut Scope) -> Result<(), DecodeError> {
        let block = scope.buf.read_block_ref()?;
        let mut inner = Scope::reader(scope.buf.block(block)?);
        let offset = inner.buf.position();
        let raw = inner.buf.read_varint()?;
        let Label::Length(index) = Label::classify(raw) else {
            return Err(DecodeError::UnexpectedLabel {
                expected: "error index",
                label: raw,
                offset,
            });
        };
        let value = self.desc(&mut inner)?;
        let error = FieldError::from_value(value).map_err(DecodeError::MalformedError)?;
        self.errors.push((index, error));
        Ok(())
    }
}

fn checked_len(scope: &Scope, len: u64) -> Result<usize, DecodeError> {
    let remaining = scope.buf.remaining();
    if len > remaining as u64 {
        return Err(DecodeError::LengthOverflow { len, remaining });
    }
    Ok(len as usize)
}

fn read_f64(scope: &mut Scope) -> Result<f64, DecodeError> {
    let raw = scope.buf.read_raw_bytes(8)?;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(raw);
    Ok(f64::from_le_bytes(bytes))
}

/// Fewest bytes a value of `ty` can occupy.
fn min_size(ty: &WireType) -> usize {
    match ty {
        WireType::Scalar(ScalarKind::Float64) => 8,
        WireType::Scalar(_) | WireType::Array(_) | WireType::Nullable(_) | WireType::SelfDescribing => 1,
        WireType::Block(_) => argo_wire::BLOCK_REF_SIZE,
        WireType::Record(fields) => fields
            .iter()
            .map(|f| if f.omittable { 1 } else { min_size(&f.of) })
            .sum(),
    }
}

//! Message-level entry points.
//!
//! Message layout:
//!
//! ```text
//! [header]
//! [data]                      typed value, or self-describing value
//! [count][error ref]...       if HAS_ERRORS: errors not attached inline
//! [extensions ref]            if HAS_EXTENSIONS
//! [blocks]
//! ```

use argo_core::{ExecutionResult, Value};
use argo_typer::TypeError;
use argo_wire::{ByteBuffer, HEADER_SIZE, Header, WireType};

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{DecodeError, EncodeError};
use crate::options::CodecOptions;
use crate::scope::Scope;

/// Extensions are stored out of band as a self-describing value.
fn extensions_type() -> WireType {
    WireType::block(WireType::DESC)
}

/// Encoder and decoder for the results of one operation.
///
/// Resolve once, then reuse for every result of that operation.
#[derive(Clone, Debug)]
pub struct ExecutionResultCodec {
    /// Type of `data`: always nullable.
    data_type: WireType,
    options: CodecOptions,
}

impl ExecutionResultCodec {
    /// Codec for results whose `data` has wire type `root`.
    pub fn new(root: WireType) -> Self {
        let data_type = match root {
            nullable @ WireType::Nullable(_) => nullable,
            other => WireType::nullable(other),
        };
        Self {
            data_type,
            options: CodecOptions::default(),
        }
    }

    /// Parse schema and query text and resolve `operation`.
    pub fn from_text(schema: &str, query: &str, operation: Option<&str>) -> Result<Self, TypeError> {
        Ok(Self::new(argo_typer::resolve_text(schema, query, operation)?))
    }

    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn data_type(&self) -> &WireType {
        &self.data_type
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode into a buffer that still has to be compacted.
    pub fn encode(&self, result: &ExecutionResult) -> Result<ByteBuffer, EncodeError> {
        let header = Header {
            self_describing: false,
            has_errors: !result.errors.is_empty(),
            no_dedup: !self.options.deduplicate,
            has_extensions: result.extensions.is_some(),
        };
        let mut out = Scope::writer();
        out.buf.write_raw_bytes(&header.to_bytes());

        let mut encoder = Encoder::new(self.options, &result.errors);
        encoder.value(&mut out, &self.data_type, &result.data)?;

        if header.has_errors {
            let detached = encoder.unattached();
            out.buf.write_varint(detached.len() as i64);
            for &index in &detached {
                encoder.error_block(&mut out, index)?;
            }
            tracing::debug!(
                errors = result.errors.len(),
                inline = result.errors.len() - detached.len(),
                "encoded field errors"
            );
        }
        if let Some(extensions) = &result.extensions {
            encoder.value(&mut out, &extensions_type(), extensions)?;
        }

        tracing::debug!(bytes = out.buf.total_len(), "encoded result");
        Ok(out.buf)
    }

    /// Encode and compact.
    pub fn encode_to_vec(&self, result: &ExecutionResult) -> Result<Vec<u8>, EncodeError> {
        let mut buf = self.encode(result)?;
        buf.compact()?;
        Ok(buf.into_bytes()?)
    }

    /// Decode a message produced by `encode` or `encode_desc`.
    pub fn decode(&self, bytes: &[u8]) -> Result<ExecutionResult, DecodeError> {
        let header = Header::from_bytes(bytes)?;
        if header.self_describing {
            let data = decode_desc_body(bytes, header, self.options)?;
            return Ok(ExecutionResult::new(data));
        }

        let mut scope = Scope::reader(bytes);
        scope.buf.read_raw_bytes(HEADER_SIZE)?;
        let mut decoder = Decoder::new(self.options, !header.no_dedup);
        let data = decoder.value(&mut scope, &self.data_type)?;

        if header.has_errors {
            let offset = scope.buf.position();
            let count = scope.buf.read_varint()?;
            if count < 0 {
                return Err(DecodeError::UnexpectedLabel {
                    expected: "error count",
                    label: count,
                    offset,
                });
            }
            for _ in 0..count {
                decoder.error_block(&mut scope)?;
            }
        }
        let extensions = if header.has_extensions {
            Some(decoder.value(&mut scope, &extensions_type())?)
        } else {
            None
        };

        let errors = decoder.into_errors();
        tracing::debug!(bytes = bytes.len(), errors = errors.len(), "decoded result");
        Ok(ExecutionResult {
            data,
            errors,
            extensions,
        })
    }
}

/// Encode `value` against `ty` as a message without errors or extensions.
///
/// Returns a buffer that still has to be compacted.
pub fn encode_value(
    ty: &WireType,
    value: &Value,
    options: CodecOptions,
) -> Result<ByteBuffer, EncodeError> {
    let header = Header {
        no_dedup: !options.deduplicate,
        ..Header::default()
    };
    let mut out = Scope::writer();
    out.buf.write_raw_bytes(&header.to_bytes());
    Encoder::new(options, &[]).value(&mut out, ty, value)?;
    Ok(out.buf)
}

/// Inverse of `encode_value`.
pub fn decode_value(ty: &WireType, bytes: &[u8], options: CodecOptions) -> Result<Value, DecodeError> {
    let header = Header::from_bytes(bytes)?;
    if header.self_describing {
        return decode_desc_body(bytes, header, options);
    }
    let mut scope = Scope::reader(bytes);
    scope.buf.read_raw_bytes(HEADER_SIZE)?;
    Decoder::new(options, !header.no_dedup).value(&mut scope, ty)
}

/// Encode any value self-describingly, without a schema.
pub fn encode_desc(value: &Value, options: CodecOptions) -> Result<Vec<u8>, EncodeError> {
    let header = Header {
        self_describing: true,
        no_dedup: !options.deduplicate,
        ..Header::default()
    };
    let mut out = Scope::writer();
    out.buf.write_raw_bytes(&header.to_bytes());
    Encoder::new(options, &[]).desc(&mut out, value)?;
    tracing::debug!(bytes = out.buf.total_len(), "encoded self-describing value");
    Ok(out.finish()?)
}

/// Decode a message produced by `encode_desc`.
pub fn decode_desc(bytes: &[u8], options: CodecOptions) -> Result<Value, DecodeError> {
    let header = Header::from_bytes(bytes)?;
    if !header.self_describing {
        return Err(DecodeError::NotSelfDescribing);
    }
    decode_desc_body(bytes, header, options)
}

fn decode_desc_body(bytes: &[u8], header: Header, options: CodecOptions) -> Result<Value, DecodeError> {
    let mut scope = Scope::reader(bytes);
    scope.buf.read_raw_bytes(HEADER_SIZE)?;
    Decoder::new(options, !header.no_dedup).desc(&mut scope)
}

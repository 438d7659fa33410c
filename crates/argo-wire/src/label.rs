//! Label vocabulary of the primary stream.
//!
//! A label is one signed varint. Its meaning depends on the wire type being
//! read, but the partition of the integer line is fixed:
//!
//! | label   | meaning                                           |
//! |---------|---------------------------------------------------|
//! | `>= 0`  | length, count, `NON_NULL` (0) or boolean (0/1)    |
//! | `-1`    | `NULL`                                            |
//! | `-2`    | `ABSENT`                                          |
//! | `-3`    | `ERROR`                                           |
//! | `<= -4` | back-reference to dictionary id `-4 - label`      |

/// Explicit null at a `Nullable` position.
pub const NULL: i64 = -1;
/// Omittable field left out of the record.
pub const ABSENT: i64 = -2;
/// Field error; a block reference to the error payload follows.
pub const ERROR: i64 = -3;
/// Value present at a position whose type does not start with a label.
pub const NON_NULL: i64 = 0;
/// Label of dictionary id 0; id `n` is `BACKREF_BASE - n`.
pub const BACKREF_BASE: i64 = -4;

/// Classified label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    /// Literal length, element count, or other non-negative payload.
    Length(u64),
    Null,
    Absent,
    Error,
    /// Back-reference to a dictionary id.
    Backref(u64),
}

impl Label {
    pub fn classify(raw: i64) -> Self {
        match raw {
            NULL => Label::Null,
            ABSENT => Label::Absent,
            ERROR => Label::Error,
            n if n >= 0 => Label::Length(n as u64),
            n => Label::Backref((BACKREF_BASE - n) as u64),
        }
    }

    /// Encode a dictionary id as a back-reference label.
    pub fn backref(id: u32) -> i64 {
        BACKREF_BASE - i64::from(id)
    }
}

/// Inline type tag of a self-describing value.
///
/// `Null` shares its value with the `NULL` label, so a nullable
/// self-describing position needs no extra marker.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(i8)]
pub enum DescTag {
    Null = -1,
    False = 0,
    True = 1,
    Object = 2,
    List = 3,
    String = 4,
    Bytes = 5,
    Int = 6,
    Float = 7,
}

impl DescTag {
    /// Convert from a raw label; `None` for unknown tags.
    pub fn from_i64(v: i64) -> Option<Self> {
        match v {
            -1 => Some(Self::Null),
            0 => Some(Self::False),
            1 => Some(Self::True),
            2 => Some(Self::Object),
            3 => Some(Self::List),
            4 => Some(Self::String),
            5 => Some(Self::Bytes),
            6 => Some(Self::Int),
            7 => Some(Self::Float),
            _ => None,
        }
    }

    pub fn to_i64(self) -> i64 {
        self as i8 as i64
    }
}

use super::label::*;

#[test]
fn classify_sentinels() {
    assert_eq!(Label::classify(-1), Label::Null);
    assert_eq!(Label::classify(-2), Label::Absent);
    assert_eq!(Label::classify(-3), Label::Error);
    assert_eq!(Label::classify(0), Label::Length(0));
    assert_eq!(Label::classify(42), Label::Length(42));
}

#[test]
fn backrefs_start_below_sentinels() {
    assert_eq!(Label::backref(0), -4);
    assert_eq!(Label::backref(1), -5);
    assert_eq!(Label::classify(-4), Label::Backref(0));
    assert_eq!(Label::classify(-104), Label::Backref(100));
}

#[test]
fn backref_classifies_back_to_its_id() {
    for id in [0u32, 1, 100, u32::MAX] {
        assert_eq!(Label::classify(Label::backref(id)), Label::Backref(u64::from(id)));
    }
}

#[test]
fn extreme_backref_does_not_wrap() {
    assert_eq!(
        Label::classify(i64::MIN),
        Label::Backref((-4i128 - i64::MIN as i128) as u64)
    );
}

#[test]
fn desc_tag_from_i64_valid() {
    assert_eq!(DescTag::from_i64(-1), Some(DescTag::Null));
    assert_eq!(DescTag::from_i64(0), Some(DescTag::False));
    assert_eq!(DescTag::from_i64(1), Some(DescTag::True));
    assert_eq!(DescTag::from_i64(2), Some(DescTag::Object));
    assert_eq!(DescTag::from_i64(3), Some(DescTag::List));
    assert_eq!(DescTag::from_i64(4), Some(DescTag::String));
    assert_eq!(DescTag::from_i64(5), Some(DescTag::Bytes));
    assert_eq!(DescTag::from_i64(6), Some(DescTag::Int));
    assert_eq!(DescTag::from_i64(7), Some(DescTag::Float));
}

#[test]
fn desc_tag_from_i64_invalid() {
    assert_eq!(DescTag::from_i64(8), None);
    assert_eq!(DescTag::from_i64(-2), None);
}

#[test]
fn desc_null_matches_null_label() {
    assert_eq!(DescTag::Null.to_i64(), NULL);
}

use super::{Code, CodeLocation, Position};
use std::rc::Rc;

#[test]
fn positions_are_one_based_and_reset_on_line_breaks() {
    let code = Code::from("ab\ncde\nf");
    assert_eq!(code.obtain_position(0), Position::new(1, 1));
    assert_eq!(code.obtain_position(1), Position::new(1, 2));
    assert_eq!(code.obtain_position(3), Position::new(2, 1));
    assert_eq!(code.obtain_position(5), Position::new(2, 3));
    assert_eq!(code.obtain_position(7), Position::new(3, 1));
}

#[test]
fn columns_count_codepoints_not_bytes() {
    let code = Code::from("éx");
    // The two byte codepoint occupies one column.
    assert_eq!(code.obtain_position(2), Position::new(1, 2));
}

#[test]
fn position_round_trips_to_byte_offsets() {
    let code = Code::from("ab\ncdé f");
    for pointer in [0usize, 1, 3, 4, 7] {
        let position = code.obtain_position(pointer);
        assert_eq!(code.obtain_pointer(position), Some(pointer));
    }
    assert_eq!(code.obtain_pointer(Position::new(0, 1)), None);
}

#[test]
fn code_point_iteration_yields_offsets_and_chars() {
    let code = Code::from("aé中");
    let points: Vec<(usize, char)> = code.code_points().collect();
    assert_eq!(points, vec![(0, 'a'), (1, 'é'), (3, '中')]);
    assert_eq!(code.char_at(1), Some('é'));
    assert_eq!(code.char_at(99), None);
}

#[test]
fn slicing_stays_within_bounds() {
    let code = Code::from("abc");
    assert_eq!(code.slice(1, 99), b"bc");
    assert_eq!(code.text(0, 2), "ab");
    assert_eq!(code.slice(5, 9), b"");
}

#[test]
fn locations_are_inclusive_start_exclusive_end() {
    let code = Code::from("let x = 1;");
    let file: Rc<str> = Rc::from("test.src");
    let location = CodeLocation::from_span(&code, &file, 4, 5, "global");
    assert_eq!(location.start, Position::new(1, 5));
    assert_eq!(location.end, Position::new(1, 6));
    assert!(location.contains_point(1, 5));
    assert!(!location.contains_point(1, 6));
    assert_eq!(location.len_bytes(), 1);

    let wider = CodeLocation::from_span(&code, &file, 0, 10, "global");
    assert!(wider.encloses(&location));
    assert!(!location.encloses(&wider));
}

//! Computer keyboard to note id
//!
//! Lower row "zxcvbnm,./" plays C#3..A#3, upper row "asdfghjkl;" plays
//! B3..G#4.

const LOWER_ROW: [char; 10] = ['z', 'x', 'c', 'v', 'b', 'n', 'm', ',', '.', '/'];
const UPPER_ROW: [char; 10] = ['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', ';'];

pub fn note_for_key(key: char) -> Option<i32> {
    let key = key.to_ascii_lowercase();
    LOWER_ROW
        .iter()
        .chain(UPPER_ROW.iter())
        .position(|&k| k == key)
        .map(|idx| idx as i32)
}

pub fn legend() -> String {
    let row = |keys: &[char], first: i32| {
        keys.iter()
            .zip(first..)
            .filter_map(|(k, id)| steelpan::NoteId::new(id).map(|n| format!("{k}:{n}")))
            .collect::<Vec<_>>()
            .join(" ")
    };
    format!("{}  |  {}", row(&LOWER_ROW, 0), row(&UPPER_ROW, 10))
}

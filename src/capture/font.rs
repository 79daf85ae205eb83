//! A tiny 5x7 bitmap font covering the characters used in capture stamps.

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per character in font units, including one column of spacing.
pub const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

// Each row is 5 bits wide, most significant bit is the leftmost column.
const DIGITS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

const UNDERSCORE: [u8; 7] = [0, 0, 0, 0, 0, 0, 0b11111];
const HYPHEN: [u8; 7] = [0, 0, 0, 0b11111, 0, 0, 0];
const COLON: [u8; 7] = [0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0];
const PERIOD: [u8; 7] = [0, 0, 0, 0, 0, 0b01100, 0b01100];
const SPACE: [u8; 7] = [0; 7];
const UNKNOWN: [u8; 7] = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

pub fn glyph(c: char) -> &'static [u8; 7] {
    match c {
        '0'..='9' => &DIGITS[(c as u8 - b'0') as usize],
        '_' => &UNDERSCORE,
        '-' => &HYPHEN,
        ':' => &COLON,
        '.' => &PERIOD,
        ' ' => &SPACE,
        _ => &UNKNOWN,
    }
}

/// Pixel size of `text` rendered at `scale`. The trailing spacing column of the
/// last glyph is not counted.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return (0, 0);
    }
    let width = (chars * GLYPH_ADVANCE - 1) * scale;
    (width, GLYPH_HEIGHT * scale)
}

/// Yields the font-unit coordinates of every lit pixel of `text`.
pub fn lit_pixels(text: &str) -> impl Iterator<Item = (u32, u32)> + '_ {
    text.chars().enumerate().flat_map(|(index, c)| {
        let rows = glyph(c);
        let origin_x = index as u32 * GLYPH_ADVANCE;
        (0..GLYPH_HEIGHT).flat_map(move |row| {
            let bits = rows[row as usize];
            (0..GLYPH_WIDTH)
                .filter(move |col| bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0)
                .map(move |col| (origin_x + col, row))
        })
    })
}

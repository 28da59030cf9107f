use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub comment: Color,
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub kind: Color,      // Cyan for node kind names
    pub attr: Color,      // Grey-blue for attribute labels
    pub flag: Color,      // Green for set flags
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub selection_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    comment: Color::Rgb(108, 112, 134),
    keyword: Color::Rgb(137, 180, 250),        // Blue for keywords
    string: Color::Rgb(250, 179, 135),         // Orange for strings
    number: Color::Rgb(250, 179, 135),         // Orange for numbers
    kind: Color::Rgb(148, 226, 213),           // Cyan/teal for node kinds
    attr: Color::Rgb(137, 180, 250),
    flag: Color::Rgb(166, 227, 161),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),
    selection_bg: Color::Rgb(69, 71, 90),
};

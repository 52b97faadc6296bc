//! Color types and CSS color parsing

use std::str::FromStr;

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1};
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::{all_consuming, map, opt, value};
use nom::multi::many0;
use nom::number::complete::float;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;
use thiserror::Error;

/// RGBA color with f32 components (0.0 to 1.0)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Error returned when a CSS color string cannot be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color value")]
    Empty,

    #[error("unrecognized color: {0}")]
    Unrecognized(String),
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const BLUE: Color = Color::rgba(0.0, 0.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 components (0-255)
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Parse a CSS color: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
    /// `rgb()`/`rgba()`, `hsl()`/`hsla()` (comma or space separated, with
    /// an optional `/ alpha`) or one of the CSS named colors.
    pub fn parse(input: &str) -> Result<Color, ColorParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Ok((_, color)) = all_consuming(hex_color)(input) {
            return Ok(color);
        }
        if let Ok((_, color)) = all_consuming(functional_color)(input) {
            return Ok(color);
        }

        named_color(input).ok_or_else(|| ColorParseError::Unrecognized(input.to_string()))
    }

    /// Convert to u8 array [r, g, b, a]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn hex_color(input: &str) -> IResult<&str, Color> {
    let (rest, digits) = preceded(char('#'), take_while1(|c: char| c.is_ascii_hexdigit()))(input)?;

    let nibble = |c: char| c.to_digit(16).unwrap_or(0) as u8;
    let byte = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);

    let color = match digits.len() {
        3 | 4 => {
            let mut channels = [255u8; 4];
            for (slot, c) in channels.iter_mut().zip(digits.chars()) {
                *slot = nibble(c) * 17;
            }
            Color::from_rgba8(channels[0], channels[1], channels[2], channels[3])
        }
        6 | 8 => {
            let alpha = if digits.len() == 8 {
                byte(&digits[6..8])
            } else {
                255
            };
            Color::from_rgba8(
                byte(&digits[0..2]),
                byte(&digits[2..4]),
                byte(&digits[4..6]),
                alpha,
            )
        }
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::LengthValue,
            )));
        }
    };

    Ok((rest, color))
}

/// A numeric argument of a functional color
#[derive(Clone, Copy, Debug, PartialEq)]
enum Arg {
    Number(f32),
    Percent(f32),
    Degrees(f32),
}

fn arg(input: &str) -> IResult<&str, Arg> {
    map(
        pair(float, opt(alt((tag("%"), tag_no_case("deg"))))),
        |(number, unit)| match unit {
            Some("%") => Arg::Percent(number),
            Some(_) => Arg::Degrees(number),
            None => Arg::Number(number),
        },
    )(input)
}

/// Arguments separated by commas, whitespace, or a `/` before alpha
fn arguments(input: &str) -> IResult<&str, Vec<Arg>> {
    let (rest, first) = arg(input)?;
    let (rest, others) = many0(preceded(
        alt((
            value((), ws(char(','))),
            value((), ws(char('/'))),
            value((), multispace1),
        )),
        arg,
    ))(rest)?;

    let mut args = Vec::with_capacity(others.len() + 1);
    args.push(first);
    args.extend(others);
    Ok((rest, args))
}

fn reject(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify))
}

/// `rgb()`, `rgba()`, `hsl()` and `hsla()` in comma or space syntax
fn functional_color(input: &str) -> IResult<&str, Color> {
    let (rest, name) = alt((
        tag_no_case("rgba"),
        tag_no_case("rgb"),
        tag_no_case("hsla"),
        tag_no_case("hsl"),
    ))(input)?;
    let (rest, args) = delimited(ws(char('(')), arguments, ws(char(')')))(rest)?;

    if args.len() != 3 && args.len() != 4 {
        return Err(reject(input));
    }
    let alpha = match args.get(3) {
        None => 1.0,
        Some(Arg::Number(a)) => *a,
        Some(Arg::Percent(p)) => p / 100.0,
        Some(Arg::Degrees(_)) => return Err(reject(input)),
    }
    .clamp(0.0, 1.0);

    let color = if name.to_ascii_lowercase().starts_with("rgb") {
        let mut channels = [0.0f32; 3];
        for (slot, arg) in channels.iter_mut().zip(&args) {
            *slot = match *arg {
                Arg::Number(v) => v / 255.0,
                Arg::Percent(p) => p / 100.0,
                Arg::Degrees(_) => return Err(reject(input)),
            }
            .clamp(0.0, 1.0);
        }
        Color::rgba(channels[0], channels[1], channels[2], alpha)
    } else {
        let hue = match args[0] {
            Arg::Number(h) | Arg::Degrees(h) => h,
            Arg::Percent(_) => return Err(reject(input)),
        };
        let fraction = |arg: Arg| match arg {
            Arg::Number(v) | Arg::Percent(v) => Ok((v / 100.0).clamp(0.0, 1.0)),
            Arg::Degrees(_) => Err(reject(input)),
        };
        let (r, g, b) = hsl_to_rgb(hue, fraction(args[1])?, fraction(args[2])?);
        Color::rgba(r, g, b, alpha)
    };

    Ok((rest, color))
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (f32, f32, f32) {
    let sector = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    (r + m, g + m, b + m)
}

fn named_color(name: &str) -> Option<Color> {
    let name = name.to_ascii_lowercase();
    if name == "transparent" {
        return Some(Color::TRANSPARENT);
    }
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(_, rgb)| {
            let [_, r, g, b] = rgb.to_be_bytes();
            Color::from_rgba8(r, g, b, 255)
        })
}

/// CSS named colors
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("grey", 0x808080),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse("#0a2947").unwrap().to_rgba8(), [10, 41, 71, 255]);
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#ff000080").unwrap().to_rgba8(), [255, 0, 0, 128]);
        assert!(Color::parse("#12345").is_err());
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(
            Color::parse("rgb(255, 0, 0)").unwrap().to_rgba8(),
            [255, 0, 0, 255]
        );
        let c = Color::parse("rgba(0, 0, 255, 0.5)").unwrap();
        assert_eq!(c.b, 1.0);
        assert_eq!(c.a, 0.5);
        assert!(Color::parse("rgb(1, 2)").is_err());
        assert!(Color::parse("rgb(1, 2, 3, 4, 5)").is_err());
    }

    #[test]
    fn parses_space_separated_and_percent_channels() {
        assert_eq!(
            Color::parse("rgb(10 20 30)").unwrap().to_rgba8(),
            [10, 20, 30, 255]
        );
        assert_eq!(
            Color::parse("rgb(0%, 100%, 0%)").unwrap().to_rgba8(),
            [0, 255, 0, 255]
        );
        let c = Color::parse("rgb(255 0 0 / 50%)").unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.a, 0.5);
    }

    #[test]
    fn parses_hsl() {
        assert_eq!(
            Color::parse("hsl(120, 100%, 25%)").unwrap().to_rgba8(),
            [0, 128, 0, 255]
        );
        assert_eq!(Color::parse("hsl(0deg 100% 50%)").unwrap(), Color::RED);
        assert_eq!(
            Color::parse("HSLA(240, 100%, 50%, 0.25)").unwrap(),
            Color::rgba(0.0, 0.0, 1.0, 0.25)
        );
        assert!(Color::parse("hsl(50%, 100%, 50%)").is_err());
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!(Color::parse("White").unwrap(), Color::WHITE);
        assert_eq!(
            Color::parse("lightgrey").unwrap().to_rgba8(),
            [211, 211, 211, 255]
        );
        assert_eq!(Color::parse("green").unwrap().to_rgba8(), [0, 128, 0, 255]);
        assert_eq!(Color::parse("darkgreen").unwrap().to_rgba8(), [0, 100, 0, 255]);
        assert_eq!(
            Color::parse("RebeccaPurple").unwrap().to_rgba8(),
            [102, 51, 153, 255]
        );
        assert_eq!(NAMED_COLORS.len(), 148);
    }

    #[test]
    fn rejects_empty_and_unknown() {
        assert_eq!(Color::parse("   "), Err(ColorParseError::Empty));
        assert_eq!(
            Color::parse("notacolor"),
            Err(ColorParseError::Unrecognized("notacolor".into()))
        );
    }
}

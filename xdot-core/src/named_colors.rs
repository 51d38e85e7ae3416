use crate::color::Rgba;

/// 颜色方案。Graphviz 默认使用 X11 方案，少数名称在 SVG 方案中取值不同。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    X11,
    Svg,
}

/// 按名称查找颜色，名称大小写不敏感，忽略空白。
pub fn lookup(name: &str, scheme: ColorScheme) -> Option<Rgba> {
    let lower: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if let Some(level) = gray_level(&lower) {
        let value = (level as f64 / 100.0 * 255.0).round() as u8;
        return Some(Rgba::from_u8(value, value, value, 255));
    }

    if scheme == ColorScheme::Svg {
        if let Some(color) = svg_override(&lower) {
            return Some(color);
        }
    }

    base_table(&lower)
}

/// `gray0` ~ `gray100`（以及 `grey` 拼写）。
fn gray_level(name: &str) -> Option<u32> {
    let digits = name
        .strip_prefix("gray")
        .or_else(|| name.strip_prefix("grey"))?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let level: u32 = digits.parse().ok()?;
    (level <= 100).then_some(level)
}

fn svg_override(name: &str) -> Option<Rgba> {
    match name {
        "gray" | "grey" => Some(rgb(128, 128, 128)),
        "green" => Some(rgb(0, 128, 0)),
        "maroon" => Some(rgb(128, 0, 0)),
        "purple" => Some(rgb(128, 0, 128)),
        _ => None,
    }
}

#[inline]
fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    Rgba::from_u8(r, g, b, 255)
}

fn base_table(name: &str) -> Option<Rgba> {
    let color = match name {
        "none" | "transparent" | "invis" => Rgba::TRANSPARENT,
        "black" => rgb(0, 0, 0),
        "white" => rgb(255, 255, 255),
        "red" => rgb(255, 0, 0),
        "green" => rgb(0, 255, 0),
        "blue" => rgb(0, 0, 255),
        "yellow" => rgb(255, 255, 0),
        "cyan" | "aqua" => rgb(0, 255, 255),
        "magenta" | "fuchsia" => rgb(255, 0, 255),
        "orange" => rgb(255, 165, 0),
        "purple" => rgb(160, 32, 240),
        "pink" => rgb(255, 192, 203),
        "brown" => rgb(165, 42, 42),
        "gray" | "grey" => rgb(192, 192, 192),
        "lightgray" | "lightgrey" => rgb(211, 211, 211),
        "darkgray" | "darkgrey" => rgb(169, 169, 169),
        "navy" | "navyblue" => rgb(0, 0, 128),
        "teal" => rgb(0, 128, 128),
        "olive" => rgb(128, 128, 0),
        "maroon" => rgb(176, 48, 96),
        "silver" => rgb(192, 192, 192),
        "lime" => rgb(0, 255, 0),
        "coral" => rgb(255, 127, 80),
        "salmon" => rgb(250, 128, 114),
        "gold" => rgb(255, 215, 0),
        "goldenrod" => rgb(218, 165, 32),
        "indigo" => rgb(75, 0, 130),
        "violet" => rgb(238, 130, 238),
        "turquoise" => rgb(64, 224, 208),
        "tomato" => rgb(255, 99, 71),
        "skyblue" => rgb(135, 206, 235),
        "steelblue" => rgb(70, 130, 180),
        "slateblue" => rgb(106, 90, 205),
        "slategray" | "slategrey" => rgb(112, 128, 144),
        "lightslategray" | "lightslategrey" => rgb(119, 136, 153),
        "royalblue" => rgb(65, 105, 225),
        "plum" => rgb(221, 160, 221),
        "orchid" => rgb(218, 112, 214),
        "orangered" => rgb(255, 69, 0),
        "mediumblue" => rgb(0, 0, 205),
        "limegreen" => rgb(50, 205, 50),
        "lightblue" => rgb(173, 216, 230),
        "lightskyblue" => rgb(135, 206, 250),
        "khaki" => rgb(240, 230, 140),
        "ivory" => rgb(255, 255, 240),
        "hotpink" => rgb(255, 105, 180),
        "honeydew" => rgb(240, 255, 240),
        "greenyellow" => rgb(173, 255, 47),
        "forestgreen" => rgb(34, 139, 34),
        "firebrick" => rgb(178, 34, 34),
        "dodgerblue" => rgb(30, 144, 255),
        "dimgray" | "dimgrey" => rgb(105, 105, 105),
        "deeppink" => rgb(255, 20, 147),
        "deepskyblue" => rgb(0, 191, 255),
        "darkred" => rgb(139, 0, 0),
        "darkgreen" => rgb(0, 100, 0),
        "darkblue" => rgb(0, 0, 139),
        "crimson" => rgb(220, 20, 60),
        "cornflowerblue" => rgb(100, 149, 237),
        "chocolate" => rgb(210, 105, 30),
        "chartreuse" => rgb(127, 255, 0),
        "cadetblue" => rgb(95, 158, 160),
        "burlywood" => rgb(222, 184, 135),
        "blueviolet" => rgb(138, 43, 226),
        "bisque" => rgb(255, 228, 196),
        "beige" => rgb(245, 245, 220),
        "azure" => rgb(240, 255, 255),
        "aquamarine" => rgb(127, 255, 212),
        "antiquewhite" => rgb(250, 235, 215),
        "aliceblue" => rgb(240, 248, 255),
        "wheat" => rgb(245, 222, 179),
        "tan" => rgb(210, 180, 140),
        "snow" => rgb(255, 250, 250),
        "sienna" => rgb(160, 82, 45),
        "seagreen" => rgb(46, 139, 87),
        "sandybrown" => rgb(244, 164, 96),
        "rosybrown" => rgb(188, 143, 143),
        "powderblue" => rgb(176, 224, 230),
        "peru" => rgb(205, 133, 63),
        "peachpuff" => rgb(255, 218, 185),
        "papayawhip" => rgb(255, 239, 213),
        "palegreen" => rgb(152, 251, 152),
        "olivedrab" => rgb(107, 142, 35),
        "oldlace" => rgb(253, 245, 230),
        "navajowhite" => rgb(255, 222, 173),
        "moccasin" => rgb(255, 228, 181),
        "mistyrose" => rgb(255, 228, 225),
        "mintcream" => rgb(245, 255, 250),
        "midnightblue" => rgb(25, 25, 112),
        "mediumseagreen" => rgb(60, 179, 113),
        "mediumpurple" => rgb(147, 112, 219),
        "mediumorchid" => rgb(186, 85, 211),
        "linen" => rgb(250, 240, 230),
        "lightyellow" => rgb(255, 255, 224),
        "lightsteelblue" => rgb(176, 196, 222),
        "lightsalmon" => rgb(255, 160, 122),
        "lightpink" => rgb(255, 182, 193),
        "lightgreen" => rgb(144, 238, 144),
        "lightcyan" => rgb(224, 255, 255),
        "lightcoral" => rgb(240, 128, 128),
        "lightgoldenrod" => rgb(238, 221, 130),
        "lightgoldenrodyellow" => rgb(250, 250, 210),
        "lemonchiffon" => rgb(255, 250, 205),
        "lavender" => rgb(230, 230, 250),
        "lavenderblush" => rgb(255, 240, 245),
        "ghostwhite" => rgb(248, 248, 255),
        "gainsboro" => rgb(220, 220, 220),
        "floralwhite" => rgb(255, 250, 240),
        "darkorange" => rgb(255, 140, 0),
        "darkolivegreen" => rgb(85, 107, 47),
        "darkmagenta" => rgb(139, 0, 139),
        "darkkhaki" => rgb(189, 183, 107),
        "darkgoldenrod" => rgb(184, 134, 11),
        "darkcyan" => rgb(0, 139, 139),
        "darkviolet" => rgb(148, 0, 211),
        "darkturquoise" => rgb(0, 206, 209),
        "darkslategray" | "darkslategrey" => rgb(47, 79, 79),
        "darkslateblue" => rgb(72, 61, 139),
        "darksalmon" => rgb(233, 150, 122),
        "darkseagreen" => rgb(143, 188, 143),
        "darkorchid" => rgb(153, 50, 204),
        "cornsilk" => rgb(255, 248, 220),
        "blanchedalmond" => rgb(255, 235, 205),
        "mediumaquamarine" => rgb(102, 205, 170),
        "mediumslateblue" => rgb(123, 104, 238),
        "mediumspringgreen" => rgb(0, 250, 154),
        "mediumturquoise" => rgb(72, 209, 204),
        "mediumvioletred" => rgb(199, 21, 133),
        "paleturquoise" => rgb(175, 238, 238),
        "palevioletred" => rgb(219, 112, 147),
        "palegoldenrod" => rgb(238, 232, 170),
        "springgreen" => rgb(0, 255, 127),
        "yellowgreen" => rgb(154, 205, 50),
        "whitesmoke" => rgb(245, 245, 245),
        "seashell" => rgb(255, 245, 238),
        "lawngreen" => rgb(124, 252, 0),
        "lightseagreen" => rgb(32, 178, 170),
        "darkseagreen4" => rgb(105, 139, 105),
        "violetred" => rgb(208, 32, 144),
        "lightslateblue" => rgb(132, 112, 255),
        "indianred" => rgb(205, 92, 92),
        "saddlebrown" => rgb(139, 69, 19),
        "thistle" => rgb(216, 191, 216),
        "snow1" => rgb(255, 250, 250),
        "snow2" => rgb(238, 233, 233),
        "snow3" => rgb(205, 201, 201),
        "snow4" => rgb(139, 137, 137),
        "seashell1" => rgb(255, 245, 238),
        "seashell2" => rgb(238, 229, 222),
        "seashell3" => rgb(205, 197, 191),
        "seashell4" => rgb(139, 134, 130),
        "antiquewhite1" => rgb(255, 239, 219),
        "antiquewhite2" => rgb(238, 223, 204),
        "antiquewhite3" => rgb(205, 192, 176),
        "antiquewhite4" => rgb(139, 131, 120),
        "bisque1" => rgb(255, 228, 196),
        "bisque2" => rgb(238, 213, 183),
        "bisque3" => rgb(205, 183, 158),
        "bisque4" => rgb(139, 125, 107),
        "peachpuff1" => rgb(255, 218, 185),
        "peachpuff2" => rgb(238, 203, 173),
        "peachpuff3" => rgb(205, 175, 149),
        "peachpuff4" => rgb(139, 119, 101),
        "navajowhite1" => rgb(255, 222, 173),
        "navajowhite2" => rgb(238, 207, 161),
        "navajowhite3" => rgb(205, 179, 139),
        "navajowhite4" => rgb(139, 121, 94),
        "lemonchiffon1" => rgb(255, 250, 205),
        "lemonchiffon2" => rgb(238, 233, 191),
        "lemonchiffon3" => rgb(205, 201, 165),
        "lemonchiffon4" => rgb(139, 137, 112),
        "cornsilk1" => rgb(255, 248, 220),
        "cornsilk2" => rgb(238, 232, 205),
        "cornsilk3" => rgb(205, 200, 177),
        "cornsilk4" => rgb(139, 136, 120),
        "ivory1" => rgb(255, 255, 240),
        "ivory2" => rgb(238, 238, 224),
        "ivory3" => rgb(205, 205, 193),
        "ivory4" => rgb(139, 139, 131),
        "honeydew1" => rgb(240, 255, 240),
        "honeydew2" => rgb(224, 238, 224),
        "honeydew3" => rgb(193, 205, 193),
        "honeydew4" => rgb(131, 139, 131),
        "lavenderblush1" => rgb(255, 240, 245),
        "lavenderblush2" => rgb(238, 224, 229),
        "lavenderblush3" => rgb(205, 193, 197),
        "lavenderblush4" => rgb(139, 131, 134),
        "mistyrose1" => rgb(255, 228, 225),
        "mistyrose2" => rgb(238, 213, 210),
        "mistyrose3" => rgb(205, 183, 181),
        "mistyrose4" => rgb(139, 125, 123),
        "azure1" => rgb(240, 255, 255),
        "azure2" => rgb(224, 238, 238),
        "azure3" => rgb(193, 205, 205),
        "azure4" => rgb(131, 139, 139),
        "slateblue1" => rgb(131, 111, 255),
        "slateblue2" => rgb(122, 103, 238),
        "slateblue3" => rgb(105, 89, 205),
        "slateblue4" => rgb(71, 60, 139),
        "royalblue1" => rgb(72, 118, 255),
        "royalblue2" => rgb(67, 110, 238),
        "royalblue3" => rgb(58, 95, 205),
        "royalblue4" => rgb(39, 64, 139),
        "blue1" => rgb(0, 0, 255),
        "blue2" => rgb(0, 0, 238),
        "blue3" => rgb(0, 0, 205),
        "blue4" => rgb(0, 0, 139),
        "dodgerblue1" => rgb(30, 144, 255),
        "dodgerblue2" => rgb(28, 134, 238),
        "dodgerblue3" => rgb(24, 116, 205),
        "dodgerblue4" => rgb(16, 78, 139),
        "steelblue1" => rgb(99, 184, 255),
        "steelblue2" => rgb(92, 172, 238),
        "steelblue3" => rgb(79, 148, 205),
        "steelblue4" => rgb(54, 100, 139),
        "deepskyblue1" => rgb(0, 191, 255),
        "deepskyblue2" => rgb(0, 178, 238),
        "deepskyblue3" => rgb(0, 154, 205),
        "deepskyblue4" => rgb(0, 104, 139),
        "skyblue1" => rgb(135, 206, 255),
        "skyblue2" => rgb(126, 192, 238),
        "skyblue3" => rgb(108, 166, 205),
        "skyblue4" => rgb(74, 112, 139),
        "lightskyblue1" => rgb(176, 226, 255),
        "lightskyblue2" => rgb(164, 211, 238),
        "lightskyblue3" => rgb(141, 182, 205),
        "lightskyblue4" => rgb(96, 123, 139),
        "slategray1" => rgb(198, 226, 255),
        "slategray2" => rgb(185, 211, 238),
        "slategray3" => rgb(159, 182, 205),
        "slategray4" => rgb(108, 123, 139),
        "lightsteelblue1" => rgb(202, 225, 255),
        "lightsteelblue2" => rgb(188, 210, 238),
        "lightsteelblue3" => rgb(162, 181, 205),
        "lightsteelblue4" => rgb(110, 123, 139),
        "lightblue1" => rgb(191, 239, 255),
        "lightblue2" => rgb(178, 223, 238),
        "lightblue3" => rgb(154, 192, 205),
        "lightblue4" => rgb(104, 131, 139),
        "lightcyan1" => rgb(224, 255, 255),
        "lightcyan2" => rgb(209, 238, 238),
        "lightcyan3" => rgb(180, 205, 205),
        "lightcyan4" => rgb(122, 139, 139),
        "paleturquoise1" => rgb(187, 255, 255),
        "paleturquoise2" => rgb(174, 238, 238),
        "paleturquoise3" => rgb(150, 205, 205),
        "paleturquoise4" => rgb(102, 139, 139),
        "cadetblue1" => rgb(152, 245, 255),
        "cadetblue2" => rgb(142, 229, 238),
        "cadetblue3" => rgb(122, 197, 205),
        "cadetblue4" => rgb(83, 134, 139),
        "turquoise1" => rgb(0, 245, 255),
        "turquoise2" => rgb(0, 229, 238),
        "turquoise3" => rgb(0, 197, 205),
        "turquoise4" => rgb(0, 134, 139),
        "cyan1" => rgb(0, 255, 255),
        "cyan2" => rgb(0, 238, 238),
        "cyan3" => rgb(0, 205, 205),
        "cyan4" => rgb(0, 139, 139),
        "darkslategray1" => rgb(151, 255, 255),
        "darkslategray2" => rgb(141, 238, 238),
        "darkslategray3" => rgb(121, 205, 205),
        "darkslategray4" => rgb(82, 139, 139),
        "aquamarine1" => rgb(127, 255, 212),
        "aquamarine2" => rgb(118, 238, 198),
        "aquamarine3" => rgb(102, 205, 170),
        "aquamarine4" => rgb(69, 139, 116),
        "darkseagreen1" => rgb(193, 255, 193),
        "darkseagreen2" => rgb(180, 238, 180),
        "darkseagreen3" => rgb(155, 205, 155),
        "seagreen1" => rgb(84, 255, 159),
        "seagreen2" => rgb(78, 238, 148),
        "seagreen3" => rgb(67, 205, 128),
        "seagreen4" => rgb(46, 139, 87),
        "palegreen1" => rgb(154, 255, 154),
        "palegreen2" => rgb(144, 238, 144),
        "palegreen3" => rgb(124, 205, 124),
        "palegreen4" => rgb(84, 139, 84),
        "springgreen1" => rgb(0, 255, 127),
        "springgreen2" => rgb(0, 238, 118),
        "springgreen3" => rgb(0, 205, 102),
        "springgreen4" => rgb(0, 139, 69),
        "green1" => rgb(0, 255, 0),
        "green2" => rgb(0, 238, 0),
        "green3" => rgb(0, 205, 0),
        "green4" => rgb(0, 139, 0),
        "chartreuse1" => rgb(127, 255, 0),
        "chartreuse2" => rgb(118, 238, 0),
        "chartreuse3" => rgb(102, 205, 0),
        "chartreuse4" => rgb(69, 139, 0),
        "olivedrab1" => rgb(192, 255, 62),
        "olivedrab2" => rgb(179, 238, 58),
        "olivedrab3" => rgb(154, 205, 50),
        "olivedrab4" => rgb(105, 139, 34),
        "darkolivegreen1" => rgb(202, 255, 112),
        "darkolivegreen2" => rgb(188, 238, 104),
        "darkolivegreen3" => rgb(162, 205, 90),
        "darkolivegreen4" => rgb(110, 139, 61),
        "khaki1" => rgb(255, 246, 143),
        "khaki2" => rgb(238, 230, 133),
        "khaki3" => rgb(205, 198, 115),
        "khaki4" => rgb(139, 134, 78),
        "lightgoldenrod1" => rgb(255, 236, 139),
        "lightgoldenrod2" => rgb(238, 220, 130),
        "lightgoldenrod3" => rgb(205, 190, 112),
        "lightgoldenrod4" => rgb(139, 129, 76),
        "lightyellow1" => rgb(255, 255, 224),
        "lightyellow2" => rgb(238, 238, 209),
        "lightyellow3" => rgb(205, 205, 180),
        "lightyellow4" => rgb(139, 139, 122),
        "yellow1" => rgb(255, 255, 0),
        "yellow2" => rgb(238, 238, 0),
        "yellow3" => rgb(205, 205, 0),
        "yellow4" => rgb(139, 139, 0),
        "gold1" => rgb(255, 215, 0),
        "gold2" => rgb(238, 201, 0),
        "gold3" => rgb(205, 173, 0),
        "gold4" => rgb(139, 117, 0),
        "goldenrod1" => rgb(255, 193, 37),
        "goldenrod2" => rgb(238, 180, 34),
        "goldenrod3" => rgb(205, 155, 29),
        "goldenrod4" => rgb(139, 105, 20),
        "darkgoldenrod1" => rgb(255, 185, 15),
        "darkgoldenrod2" => rgb(238, 173, 14),
        "darkgoldenrod3" => rgb(205, 149, 12),
        "darkgoldenrod4" => rgb(139, 101, 8),
        "rosybrown1" => rgb(255, 193, 193),
        "rosybrown2" => rgb(238, 180, 180),
        "rosybrown3" => rgb(205, 155, 155),
        "rosybrown4" => rgb(139, 105, 105),
        "indianred1" => rgb(255, 106, 106),
        "indianred2" => rgb(238, 99, 99),
        "indianred3" => rgb(205, 85, 85),
        "indianred4" => rgb(139, 58, 58),
        "sienna1" => rgb(255, 130, 71),
        "sienna2" => rgb(238, 121, 66),
        "sienna3" => rgb(205, 104, 57),
        "sienna4" => rgb(139, 71, 38),
        "burlywood1" => rgb(255, 211, 155),
        "burlywood2" => rgb(238, 197, 145),
        "burlywood3" => rgb(205, 170, 125),
        "burlywood4" => rgb(139, 115, 85),
        "wheat1" => rgb(255, 231, 186),
        "wheat2" => rgb(238, 216, 174),
        "wheat3" => rgb(205, 186, 150),
        "wheat4" => rgb(139, 126, 102),
        "tan1" => rgb(255, 165, 79),
        "tan2" => rgb(238, 154, 73),
        "tan3" => rgb(205, 133, 63),
        "tan4" => rgb(139, 90, 43),
        "chocolate1" => rgb(255, 127, 36),
        "chocolate2" => rgb(238, 118, 33),
        "chocolate3" => rgb(205, 102, 29),
        "chocolate4" => rgb(139, 69, 19),
        "firebrick1" => rgb(255, 48, 48),
        "firebrick2" => rgb(238, 44, 44),
        "firebrick3" => rgb(205, 38, 38),
        "firebrick4" => rgb(139, 26, 26),
        "brown1" => rgb(255, 64, 64),
        "brown2" => rgb(238, 59, 59),
        "brown3" => rgb(205, 51, 51),
        "brown4" => rgb(139, 35, 35),
        "salmon1" => rgb(255, 140, 105),
        "salmon2" => rgb(238, 130, 98),
        "salmon3" => rgb(205, 112, 84),
        "salmon4" => rgb(139, 76, 57),
        "lightsalmon1" => rgb(255, 160, 122),
        "lightsalmon2" => rgb(238, 149, 114),
        "lightsalmon3" => rgb(205, 129, 98),
        "lightsalmon4" => rgb(139, 87, 66),
        "orange1" => rgb(255, 165, 0),
        "orange2" => rgb(238, 154, 0),
        "orange3" => rgb(205, 133, 0),
        "orange4" => rgb(139, 90, 0),
        "darkorange1" => rgb(255, 127, 0),
        "darkorange2" => rgb(238, 118, 0),
        "darkorange3" => rgb(205, 102, 0),
        "darkorange4" => rgb(139, 69, 0),
        "coral1" => rgb(255, 114, 86),
        "coral2" => rgb(238, 106, 80),
        "coral3" => rgb(205, 91, 69),
        "coral4" => rgb(139, 62, 47),
        "tomato1" => rgb(255, 99, 71),
        "tomato2" => rgb(238, 92, 66),
        "tomato3" => rgb(205, 79, 57),
        "tomato4" => rgb(139, 54, 38),
        "orangered1" => rgb(255, 69, 0),
        "orangered2" => rgb(238, 64, 0),
        "orangered3" => rgb(205, 55, 0),
        "orangered4" => rgb(139, 37, 0),
        "red1" => rgb(255, 0, 0),
        "red2" => rgb(238, 0, 0),
        "red3" => rgb(205, 0, 0),
        "red4" => rgb(139, 0, 0),
        "deeppink1" => rgb(255, 20, 147),
        "deeppink2" => rgb(238, 18, 137),
        "deeppink3" => rgb(205, 16, 118),
        "deeppink4" => rgb(139, 10, 80),
        "hotpink1" => rgb(255, 110, 180),
        "hotpink2" => rgb(238, 106, 167),
        "hotpink3" => rgb(205, 96, 144),
        "hotpink4" => rgb(139, 58, 98),
        "pink1" => rgb(255, 181, 197),
        "pink2" => rgb(238, 169, 184),
        "pink3" => rgb(205, 145, 158),
        "pink4" => rgb(139, 99, 108),
        "lightpink1" => rgb(255, 174, 185),
        "lightpink2" => rgb(238, 162, 173),
        "lightpink3" => rgb(205, 140, 149),
        "lightpink4" => rgb(139, 95, 101),
        "palevioletred1" => rgb(255, 130, 171),
        "palevioletred2" => rgb(238, 121, 159),
        "palevioletred3" => rgb(205, 104, 137),
        "palevioletred4" => rgb(139, 71, 93),
        "maroon1" => rgb(255, 52, 179),
        "maroon2" => rgb(238, 48, 167),
        "maroon3" => rgb(205, 41, 144),
        "maroon4" => rgb(139, 28, 98),
        "violetred1" => rgb(255, 62, 150),
        "violetred2" => rgb(238, 58, 140),
        "violetred3" => rgb(205, 50, 120),
        "violetred4" => rgb(139, 34, 82),
        "magenta1" => rgb(255, 0, 255),
        "magenta2" => rgb(238, 0, 238),
        "magenta3" => rgb(205, 0, 205),
        "magenta4" => rgb(139, 0, 139),
        "orchid1" => rgb(255, 131, 250),
        "orchid2" => rgb(238, 122, 233),
        "orchid3" => rgb(205, 105, 201),
        "orchid4" => rgb(139, 71, 137),
        "plum1" => rgb(255, 187, 255),
        "plum2" => rgb(238, 174, 238),
        "plum3" => rgb(205, 150, 205),
        "plum4" => rgb(139, 102, 139),
        "mediumorchid1" => rgb(224, 102, 255),
        "mediumorchid2" => rgb(209, 95, 238),
        "mediumorchid3" => rgb(180, 82, 205),
        "mediumorchid4" => rgb(122, 55, 139),
        "darkorchid1" => rgb(191, 62, 255),
        "darkorchid2" => rgb(178, 58, 238),
        "darkorchid3" => rgb(154, 50, 205),
        "darkorchid4" => rgb(104, 34, 139),
        "purple1" => rgb(155, 48, 255),
        "purple2" => rgb(145, 44, 238),
        "purple3" => rgb(125, 38, 205),
        "purple4" => rgb(85, 26, 139),
        "mediumpurple1" => rgb(171, 130, 255),
        "mediumpurple2" => rgb(159, 121, 238),
        "mediumpurple3" => rgb(137, 104, 205),
        "mediumpurple4" => rgb(93, 71, 139),
        "thistle1" => rgb(255, 225, 255),
        "thistle2" => rgb(238, 210, 238),
        "thistle3" => rgb(205, 181, 205),
        "thistle4" => rgb(139, 123, 139),
        _ => return None,
    };
    Some(color)
}

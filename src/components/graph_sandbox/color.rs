use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
	pub r: f32,
	pub g: f32,
	pub b: f32,
	pub a: f32,
}

impl Rgba {
	pub const WHITE: Rgba = Rgba {
		r: 1.0,
		g: 1.0,
		b: 1.0,
		a: 1.0,
	};

	/// Parses `#rgb`, `#rrggbb` and `#rrggbbaa`.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let hex = hex.strip_prefix('#')?;
		if !hex.is_ascii() {
			return None;
		}
		let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
		match hex.len() {
			3 => {
				let nibble = |i: usize| {
					u8::from_str_radix(&hex[i..i + 1], 16)
						.ok()
						.map(|v| (v * 17) as f32 / 255.0)
				};
				Some(Self {
					r: nibble(0)?,
					g: nibble(1)?,
					b: nibble(2)?,
					a: 1.0,
				})
			}
			6 | 8 => Some(Self {
				r: channel(&hex[0..2])?,
				g: channel(&hex[2..4])?,
				b: channel(&hex[4..6])?,
				a: if hex.len() == 8 {
					channel(&hex[6..8])?
				} else {
					1.0
				},
			}),
			_ => None,
		}
	}

	pub fn to_array(self) -> [f32; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

/// A random opaque `#rrggbb` color.
pub fn random_hex_color() -> String {
	let rgb: u32 = rand::rng().random_range(0..=0xff_ffff);
	format!("#{rgb:06x}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_forms() {
		assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::WHITE));
		assert_eq!(
			Rgba::from_hex("#ff000080").map(Rgba::to_array),
			Some([1.0, 0.0, 0.0, 128.0 / 255.0])
		);
		let c = Rgba::from_hex("#00ff00").unwrap();
		assert_eq!((c.r, c.g, c.b, c.a), (0.0, 1.0, 0.0, 1.0));
	}

	#[test]
	fn rejects_malformed_hex() {
		assert_eq!(Rgba::from_hex("ff0000"), None);
		assert_eq!(Rgba::from_hex("#ff00"), None);
		assert_eq!(Rgba::from_hex("#gg0000"), None);
		assert_eq!(Rgba::from_hex("#ééé"), None);
	}

	#[test]
	fn random_colors_are_parseable() {
		for _ in 0..16 {
			let color = random_hex_color();
			assert_eq!(color.len(), 7);
			assert!(color.bytes().skip(1).all(|b| b.is_ascii_hexdigit()));
			assert_eq!(Rgba::from_hex(&color).map(|c| c.a), Some(1.0));
		}
	}
}

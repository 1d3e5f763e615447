//! Banner ad placeholders

use serde::{Deserialize, Serialize};

use crate::constants::banner::{LABEL, LABEL_HEIGHT, LABEL_WIDTH, MASK_SUFFIX};

/// Where a banner should be shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerSlot {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl BannerSlot {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    pub fn mask_id(&self) -> String {
        format!("{}{}", self.id, MASK_SUFFIX)
    }
}

/// Escape text for use inside a double-quoted XML attribute
fn escape_attr(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// SVG placeholder: a translucent box with an outline, both diagonals and a
/// centered "AD" label punched out of the strokes
pub fn render_placeholder(slot: &BannerSlot) -> String {
    let w = f64::from(slot.width);
    let h = f64::from(slot.height);
    let mask_id = escape_attr(&slot.mask_id());
    let (cx, cy) = (w / 2.0, h / 2.0);
    let text_x = cx - LABEL_WIDTH / 2.0;
    let text_y = cy - LABEL_HEIGHT / 2.0;
    let inner_w = (w - 2.0).max(0.0);
    let inner_h = (h - 2.0).max(0.0);

    format!(
        r##"<svg class="adlad-banner-placeholder" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">
	<mask id="{mask_id}">
		<rect width="{w}" height="{h}" fill="black"/>
		<g fill="transparent" stroke="white" stroke-width="2">
			<rect x="1" y="1" width="{inner_w}" height="{inner_h}"/>
			<line x1="0" y1="0" x2="{w}" y2="{h}"/>
			<line x1="{w}" y1="0" x2="0" y2="{h}"/>
		</g>
		<rect class="text-rect" x="{text_x}" y="{text_y}" width="{LABEL_WIDTH}" height="{LABEL_HEIGHT}" fill="black"/>
		<text class="text" x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="central" fill="white" style="font: bold 15px sans-serif;">{LABEL}</text>
	</mask>
	<rect width="{w}" height="{h}" fill="#ffffff17"/>
	<rect width="{w}" height="{h}" fill="black" mask="url(#{mask_id})"/>
</svg>"##
    )
}

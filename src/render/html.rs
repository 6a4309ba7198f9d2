// Static HTML render target.
// Every item-sourced string is escaped before it reaches the markup.

use std::fmt::Write;

use crate::effects::{Decorations, TiltConfig};
use crate::error::{EcoError, Result};

use super::{CatalogView, GroupView, Logo, RenderTarget, TileView};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const TILT_CDN: &str = "https://cdnjs.cloudflare.com/ajax/libs/vanilla-tilt/1.8.1/vanilla-tilt.min.js";
const NO_MATCHES: &str = "No matching projects.";

/// Escape text for use in HTML content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A standalone page whose `#ecosystem` region holds the rendered catalogue.
#[derive(Debug, Clone, Default)]
pub struct HtmlPage {
    title: String,
    view: CatalogView,
    decorations: Decorations,
}

impl HtmlPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Serialize the full document.
    pub fn to_html(&self) -> Result<String> {
        let mut out = String::new();
        self.write_document(&mut out)
            .map_err(|e| EcoError::Other(format!("failed to build HTML: {e}")))?;
        Ok(out)
    }

    fn write_document(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "  <meta charset=\"utf-8\">")?;
        writeln!(
            out,
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        )?;
        writeln!(out, "  <title>{}</title>", escape_html(&self.title))?;
        writeln!(out, "  <script src=\"{TAILWIND_CDN}\"></script>")?;
        if self.decorations.tilt.is_some() {
            writeln!(out, "  <script src=\"{TILT_CDN}\"></script>")?;
            writeln!(out, "  <style>{}</style>", ENTRANCE_CSS)?;
        }
        writeln!(out, "</head>")?;
        writeln!(out, "<body class=\"bg-orange-50 min-h-screen p-8\">")?;
        writeln!(
            out,
            "  <main id=\"ecosystem\" class=\"grid gap-8 md:grid-cols-2 xl:grid-cols-3\">"
        )?;

        let mut tile_index = 0;
        for group in self.view.groups() {
            self.write_group(out, group, &mut tile_index)?;
        }

        writeln!(out, "  </main>")?;
        if self.view == CatalogView::NoMatches {
            writeln!(
                out,
                "  <p id=\"status\" class=\"text-center text-gray-500\">{NO_MATCHES}</p>"
            )?;
        }
        if let Some(tilt) = &self.decorations.tilt {
            write_tilt_init(out, tilt)?;
        }
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")
    }

    fn write_group(
        &self,
        out: &mut String,
        group: &GroupView,
        tile_index: &mut usize,
    ) -> std::fmt::Result {
        let base_class = if group.frosted {
            "glass-card"
        } else {
            "bg-white/80"
        };
        writeln!(
            out,
            "    <section class=\"{base_class} rounded-2xl shadow-xl p-6\">"
        )?;
        writeln!(
            out,
            "      <h2 class=\"text-2xl font-bold text-orange-600 text-center mb-6\">{}</h2>",
            escape_html(&group.title)
        )?;
        writeln!(out, "      <div class=\"grid grid-cols-3 gap-6\">")?;
        for tile in &group.tiles {
            self.write_tile(out, tile, *tile_index)?;
            *tile_index += 1;
        }
        writeln!(out, "      </div>")?;
        writeln!(out, "    </section>")
    }

    fn write_tile(&self, out: &mut String, tile: &TileView, index: usize) -> std::fmt::Result {
        let name = escape_html(&tile.name);
        let src = match &tile.logo {
            Logo::Image(url) | Logo::Avatar { url, .. } => escape_html(url),
        };

        let mut wrapper = String::from("flex flex-col items-center cursor-pointer");
        let mut extra = String::new();
        if let Some(fx) = self.decorations.tile(index) {
            wrapper.push_str(" entrance");
            write!(
                extra,
                " style=\"animation-delay: {}ms\"",
                fx.entrance_delay.as_millis()
            )?;
            if fx.reveal {
                extra.push_str(" data-reveal");
            }
        }
        let logo_class = if self.decorations.tilt.is_some() {
            "logo-glass tilt"
        } else {
            "logo-glass"
        };

        writeln!(out, "        <div class=\"{wrapper}\"{extra}>")?;
        writeln!(out, "          <div class=\"{logo_class}\">")?;
        writeln!(out, "            <img src=\"{src}\" alt=\"{name}\" loading=\"lazy\" />")?;
        writeln!(out, "          </div>")?;
        writeln!(
            out,
            "          <p class=\"text-xs mt-2 font-medium text-gray-700\">{name}</p>"
        )?;
        if let Some(description) = &tile.description {
            writeln!(
                out,
                "          <p class=\"text-xs text-gray-500 text-center\">{}</p>",
                escape_html(description)
            )?;
        }
        if !tile.socials.is_empty() {
            writeln!(out, "          <div class=\"flex gap-2 mt-1\">")?;
            for link in &tile.socials {
                writeln!(
                    out,
                    "            <a href=\"{}\" title=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    escape_html(&link.url),
                    link.kind.label(),
                    link.kind.label()
                )?;
            }
            writeln!(out, "          </div>")?;
        }
        writeln!(out, "        </div>")
    }
}

impl RenderTarget for HtmlPage {
    fn replace_content(&mut self, view: &CatalogView) -> Result<()> {
        self.view = view.clone();
        self.decorations = Decorations::default();
        Ok(())
    }

    fn decorate(&mut self, decorations: &Decorations) {
        self.decorations = decorations.clone();
    }
}

const ENTRANCE_CSS: &str = ".entrance{opacity:0;animation:fade-in .4s ease-out forwards}\
[data-reveal]{animation-play-state:paused}\
[data-reveal].revealed{animation-play-state:running}\
@keyframes fade-in{from{opacity:0;transform:scale(.92)}to{opacity:1;transform:none}}";

fn write_tilt_init(out: &mut String, tilt: &TiltConfig) -> std::fmt::Result {
    writeln!(out, "  <script>")?;
    writeln!(
        out,
        "    VanillaTilt.init(document.querySelectorAll(\".tilt\"), {{ max: {}, speed: {}, glare: {}, \"max-glare\": {} }});",
        tilt.max_degrees,
        tilt.speed.as_millis(),
        tilt.glare,
        tilt.max_glare
    )?;
    writeln!(
        out,
        "    const io = new IntersectionObserver(es => es.forEach(e => e.isIntersecting && e.target.classList.add(\"revealed\")));"
    )?;
    writeln!(
        out,
        "    document.querySelectorAll(\"[data-reveal]\").forEach(el => io.observe(el));"
    )?;
    writeln!(out, "  </script>")
}

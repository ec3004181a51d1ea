use anyhow::{anyhow, Context, Result};
use chrono::Datelike;
use image::{ImageBuffer, ImageEncoder, RgbaImage};
use sha2::{Digest, Sha256};
use usvg::{TreeParsing, TreeTextToPath};

use crate::models::contribution::{CalendarGrid, LevelClass};
use crate::services::calendar_grid::DAYS_PER_WEEK;

/// GitHub's light-theme greens, from empty to busiest
pub const GITHUB_GREEN: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatmapFormat {
    Svg,
    Png,
}

impl HeatmapFormat {
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "svg" => Ok(HeatmapFormat::Svg),
            "png" => Ok(HeatmapFormat::Png),
            other => Err(anyhow!(
                "Unsupported heatmap format '{}'. Supported: svg, png",
                other
            )),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            HeatmapFormat::Svg => "image/svg+xml",
            HeatmapFormat::Png => "image/png",
        }
    }
}

/// Layout of the rendered heatmap, in SVG user units
#[derive(Debug, Clone)]
pub struct HeatmapLayout {
    pub cell_size: usize,
    pub cell_gap: usize,
    pub day_label_width: usize,
    pub month_label_height: usize,
    pub title_height: usize,
    pub legend_height: usize,
    pub padding_right: usize,
    pub padding_bottom: usize,
    pub font_family: String,
    pub font_size: usize,
    pub text_color: String,
    pub background_color: String,
}

impl Default for HeatmapLayout {
    fn default() -> Self {
        Self {
            cell_size: 10,
            cell_gap: 3,
            day_label_width: 30,
            month_label_height: 15,
            title_height: 30,
            legend_height: 25,
            padding_right: 10,
            padding_bottom: 5,
            font_family: "-apple-system, BlinkMacSystemFont, Segoe UI, Helvetica, Arial, sans-serif"
                .to_string(),
            font_size: 10,
            text_color: "#24292f".to_string(),
            background_color: "#ffffff".to_string(),
        }
    }
}

/// Everything drawn on one heatmap besides the layout
pub struct HeatmapRequest<'a> {
    pub grid: &'a CalendarGrid,
    pub year: i32,
    pub total_contributions: u32,
    pub login: &'a str,
}

pub struct HeatmapGenerator {
    layout: HeatmapLayout,
    palette: [&'static str; 5],
}

impl Default for HeatmapGenerator {
    fn default() -> Self {
        Self::new(HeatmapLayout::default())
    }
}

impl HeatmapGenerator {
    pub fn new(layout: HeatmapLayout) -> Self {
        Self {
            layout,
            palette: GITHUB_GREEN,
        }
    }

    pub fn color_for(&self, level: LevelClass) -> &'static str {
        self.palette[level.index()]
    }

    /// Render the heatmap in the requested format
    pub fn render(&self, request: &HeatmapRequest<'_>, format: HeatmapFormat) -> Result<Vec<u8>> {
        let svg_content = self.generate_svg(request);

        match format {
            HeatmapFormat::Svg => Ok(svg_content.into_bytes()),
            HeatmapFormat::Png => self.svg_to_png(&svg_content),
        }
    }

    /// Generate SVG content
    pub fn generate_svg(&self, request: &HeatmapRequest<'_>) -> String {
        let layout = &self.layout;
        let cell_size = layout.cell_size;
        let cell_gap = layout.cell_gap;
        let step = cell_size + cell_gap;

        let num_weeks = request.grid.weeks.len().max(1);
        let graph_width = num_weeks * step - cell_gap;
        let graph_height = DAYS_PER_WEEK * step - cell_gap;

        let total_width = layout.day_label_width + graph_width + layout.padding_right;
        let total_height = layout.title_height
            + layout.month_label_height
            + graph_height
            + layout.legend_height
            + layout.padding_bottom;

        let mut svg = String::new();

        svg.push_str(&format!(
            r#"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"#,
            total_width, total_height, total_width, total_height
        ));

        svg.push_str(&format!(
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            layout.background_color
        ));

        // Username at top right, level with the title
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="end">@{}</text>"#,
            total_width - 5,
            20,
            layout.font_family,
            layout.font_size + 2,
            layout.text_color,
            escape_xml(request.login)
        ));

        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}">{} contributions in {}</text>"#,
            layout.day_label_width,
            20,
            layout.font_family,
            layout.font_size + 2,
            layout.text_color,
            request.total_contributions,
            request.year
        ));

        // Month labels, placed on the first column whose Sunday starts a new month
        let month_names = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        let mut last_month: Option<u32> = None;
        for (week_idx, week) in request.grid.weeks.iter().enumerate() {
            let Some(first_day) = week.days.first() else {
                continue;
            };
            let month = first_day.date.month0();
            if last_month != Some(month) {
                // Skip a label for the partial column from the previous year
                if first_day.date.year() == request.year || week_idx > 0 {
                    svg.push_str(&format!(
                        r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
                        layout.day_label_width + week_idx * step,
                        layout.title_height + layout.month_label_height - 3,
                        layout.font_family,
                        layout.font_size,
                        layout.text_color,
                        month_names[month as usize]
                    ));
                }
                last_month = Some(month);
            }
        }

        for (day_idx, label) in [(1, "Mon"), (3, "Wed"), (5, "Fri")] {
            let y = layout.title_height
                + layout.month_label_height
                + day_idx * step
                + cell_size / 2
                + 3;
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="start">{}</text>"#,
                5, y, layout.font_family, layout.font_size, layout.text_color, label
            ));
        }

        // Cells run down each Sunday-first column
        for (cell_idx, day) in request.grid.days().enumerate() {
            let x = layout.day_label_width + (cell_idx / DAYS_PER_WEEK) * step;
            let y = layout.title_height
                + layout.month_label_height
                + (cell_idx % DAYS_PER_WEEK) * step;

            svg.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="2" fill="{}"><title>{}: {}</title></rect>"#,
                x,
                y,
                cell_size,
                cell_size,
                self.color_for(day.level_class),
                day.date.format("%Y-%m-%d"),
                day.value
            ));
        }

        // Legend at bottom right
        let legend_y = layout.title_height + layout.month_label_height + graph_height + 8;
        let legend_width = 35 + self.palette.len() * (cell_size + 3) + 35;
        let legend_start_x = total_width.saturating_sub(legend_width + layout.padding_right);

        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="end">Less</text>"#,
            legend_start_x + 30,
            legend_y + cell_size / 2 + 3,
            layout.font_family,
            layout.font_size,
            layout.text_color
        ));

        for (i, color) in self.palette.iter().enumerate() {
            svg.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="2" fill="{}"/>"#,
                legend_start_x + 35 + i * (cell_size + 3),
                legend_y,
                cell_size,
                cell_size,
                color
            ));
        }

        svg.push_str(&format!(
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}" text-anchor="start">More</text>"#,
            legend_start_x + 40 + self.palette.len() * (cell_size + 3),
            legend_y + cell_size / 2 + 3,
            layout.font_family,
            layout.font_size,
            layout.text_color
        ));

        svg.push_str("</svg>");

        svg
    }

    /// Rasterize SVG content to PNG at 2x scale
    fn svg_to_png(&self, svg_content: &str) -> Result<Vec<u8>> {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();

        let opts = usvg::Options::default();

        // In usvg 0.37 text nodes must be converted to paths before rendering
        let mut tree = usvg::Tree::from_data(svg_content.as_bytes(), &opts)?;
        tree.convert_text(&fontdb);

        let scale = 2.0;
        let pixmap_size = tree.size.to_int_size();
        let scaled_width = (pixmap_size.width() as f32 * scale) as u32;
        let scaled_height = (pixmap_size.height() as f32 * scale) as u32;

        let mut pixmap = tiny_skia::Pixmap::new(scaled_width, scaled_height)
            .context("Failed to create pixmap")?;

        let transform = tiny_skia::Transform::from_scale(scale, scale);
        resvg::Tree::from_usvg(&tree).render(transform, &mut pixmap.as_mut());

        let img: RgbaImage =
            ImageBuffer::from_raw(pixmap.width(), pixmap.height(), pixmap.data().to_vec())
                .context("Failed to create image buffer")?;

        let mut buffer = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new_with_quality(
            &mut buffer,
            image::codecs::png::CompressionType::Best,
            image::codecs::png::FilterType::Adaptive,
        );
        encoder.write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ColorType::Rgba8,
        )?;

        Ok(buffer)
    }
}

/// SHA-256 of rendered content, used as a strong ETag
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

use reqwest::Url;

use crate::{
    render::{
        chart::{budget_segments, format_cny, ChartSegment},
        html::to_html_document,
        tree::{Element, VisualTree},
    },
    types::{HeroImage, TripActivity, TripDay, TripItinerary},
};

pub const DEFAULT_ACTIVITY_IMAGE_BASE: &str = "https://image.pollinations.ai/prompt";
const ACTIVITY_IMAGE_QUERY: &str = "width=400&height=400&nologo=true&model=flux";
const ACTIVITY_IMAGE_SUFFIX: &str = "scenery photography";

// Donut geometry: a radius whose circumference is 100 lets shares map straight onto dashes.
const DONUT_RADIUS: &str = "15.9155";
const DONUT_CIRCUMFERENCE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix of the per-activity illustration URL; the prompt is appended as a path segment.
    pub activity_image_base: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            activity_image_base: DEFAULT_ACTIVITY_IMAGE_BASE.to_string(),
        }
    }
}

/// A rendered itinerary: the visual tree plus the title used for exports.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub title: String,
    pub tree: VisualTree,
}

impl RenderedDocument {
    /// Full HTML page. Print-excluded nodes stay in the markup, hidden by `@media print`.
    pub fn to_html(&self) -> String {
        to_html_document(&self.tree, &self.title, "")
    }

    pub(crate) fn to_html_with_head(&self, head_extra: &str) -> String {
        to_html_document(&self.tree, &self.title, head_extra)
    }
}

/// Deterministic illustration URL for an activity: the same activity and destination always
/// produce the same request.
pub fn activity_image_url(base: &str, activity: &str, destination: &str) -> Option<String> {
    let prompt = format!("{} {} {}", activity, destination, ACTIVITY_IMAGE_SUFFIX);
    let mut url = Url::parse(base).ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(&prompt);
    url.set_query(Some(ACTIVITY_IMAGE_QUERY));
    Some(url.to_string())
}

pub fn render(
    itinerary: &TripItinerary,
    hero_image: Option<&HeroImage>,
    options: &RenderOptions,
) -> RenderedDocument {
    let root = Element::new("div")
        .class("itinerary")
        .child(render_hero(itinerary, hero_image))
        .child(
            Element::new("main")
                .class("content")
                .child(render_overview(itinerary))
                .child(
                    Element::new("section").class("days").children(
                        itinerary
                            .days
                            .iter()
                            .map(|day| render_day(day, &itinerary.destination_name, options)),
                    ),
                )
                .child(render_actions()),
        );

    RenderedDocument {
        title: itinerary.trip_title.clone(),
        tree: VisualTree::new(root),
    }
}

fn render_hero(itinerary: &TripItinerary, hero_image: Option<&HeroImage>) -> Element {
    let backdrop = match hero_image {
        Some(image) => Element::new("img")
            .class("hero-image")
            .attr("src", image.data_uri())
            .attr("alt", itinerary.destination_name.as_str()),
        None => Element::new("div")
            .class("hero-placeholder")
            .child(Element::new("span").text("暂无图片")),
    };

    Element::new("section")
        .class("hero")
        .child(backdrop)
        .child(
            Element::new("button")
                .class("reset-button")
                .attr("type", "button")
                .attr("data-action", "reset")
                .text("← 重新规划")
                .no_print(),
        )
        .child(
            Element::new("div")
                .class("hero-caption")
                .child(Element::new("span").class("badge").text("您的专属行程").no_print())
                .child(Element::new("h1").class("trip-title").text(itinerary.trip_title.as_str()))
                .child(Element::new("p").class("summary").text(itinerary.summary.as_str())),
        )
}

fn render_overview(itinerary: &TripItinerary) -> Element {
    let segments = budget_segments(&itinerary.budget_breakdown);

    let mut budget_card = Element::new("div")
        .class("card")
        .class("budget-card")
        .child(Element::new("h3").text("预估预算 (CNY)"))
        .child(
            Element::new("div")
                .class("budget-total")
                .attr("data-total", itinerary.budget_total().to_string())
                .text(format_cny(itinerary.budget_total()))
                .child(Element::new("span").class("approx").text(" 约")),
        );

    if !segments.is_empty() {
        budget_card = budget_card
            .child(render_donut(&segments))
            .child(render_legend(&segments));
    }

    let packing_card = Element::new("div")
        .class("card")
        .class("packing-card")
        .child(Element::new("h3").text("行前准备 / 必带物品"))
        .child(
            Element::new("ul").class("packing-list").children(
                itinerary
                    .packing_list
                    .iter()
                    .map(|item| Element::new("li").class("packing-item").text(format!("✓ {item}"))),
            ),
        );

    Element::new("section")
        .class("overview")
        .child(budget_card)
        .child(packing_card)
}

fn render_donut(segments: &[ChartSegment]) -> Element {
    let arcs = segments
        .iter()
        .filter(|segment| segment.share > 0.0)
        .map(|segment| {
            let dash = segment.share * DONUT_CIRCUMFERENCE;
            // Start at 12 o'clock and walk clockwise.
            let offset = 25.0 - segment.offset * DONUT_CIRCUMFERENCE;
            Element::new("circle")
                .class("budget-segment")
                .attr("cx", "21")
                .attr("cy", "21")
                .attr("r", DONUT_RADIUS)
                .attr("fill", "transparent")
                .attr("stroke", segment.color)
                .attr("stroke-width", "6")
                .attr("stroke-dasharray", format!("{:.3} {:.3}", dash, DONUT_CIRCUMFERENCE - dash))
                .attr("stroke-dashoffset", format!("{:.3}", offset))
                .attr("data-category", segment.category.as_str())
        });

    Element::new("svg")
        .class("budget-chart")
        .attr("viewBox", "0 0 42 42")
        .attr("role", "img")
        .attr("aria-label", "预算分布")
        .children(arcs)
}

fn render_legend(segments: &[ChartSegment]) -> Element {
    Element::new("ul").class("budget-legend").children(segments.iter().map(|segment| {
        Element::new("li")
            .class("budget-entry")
            .attr("data-color", segment.color)
            .child(
                Element::new("span")
                    .class("swatch")
                    .attr("style", format!("background:{}", segment.color)),
            )
            .text(format!("{}: {}", segment.category, format_cny(segment.amount)))
    }))
}

fn render_day(day: &TripDay, destination: &str, options: &RenderOptions) -> Element {
    Element::new("article")
        .class("day")
        .attr("data-day", day.day_number.to_string())
        .child(
            Element::new("header")
                .class("day-marker")
                .child(Element::new("div").class("day-badge").text(day.day_number.to_string()))
                .child(
                    Element::new("div")
                        .child(Element::new("h2").text(format!("第 {} 天", day.day_number)))
                        .child(Element::new("p").class("day-theme").text(day.theme.as_str())),
                ),
        )
        .child(
            Element::new("ol").class("timeline").children(
                day.activities
                    .iter()
                    .map(|activity| render_activity(activity, destination, options)),
            ),
        )
}

fn render_activity(activity: &TripActivity, destination: &str, options: &RenderOptions) -> Element {
    let mut figure = Element::new("div").class("activity-image");
    if let Some(src) =
        activity_image_url(&options.activity_image_base, &activity.activity, destination)
    {
        figure = figure.child(
            Element::new("img")
                .attr("src", src)
                .attr("alt", activity.activity.as_str())
                .attr("loading", "lazy")
                .attr("onerror", "this.classList.add('img-fallback')"),
        );
    }

    Element::new("li")
        .class("activity")
        .child(figure)
        .child(
            Element::new("div")
                .class("activity-body")
                .child(
                    Element::new("div")
                        .class("activity-meta")
                        .child(
                            Element::new("span")
                                .class("activity-time")
                                .text(activity.time.as_str()),
                        )
                        .child(
                            Element::new("span")
                                .class("activity-location")
                                .text(format!("📍 {}", activity.location)),
                        ),
                )
                .child(Element::new("h3").class("activity-name").text(activity.activity.as_str()))
                .child(
                    Element::new("p")
                        .class("activity-description")
                        .text(activity.description.as_str()),
                ),
        )
}

fn render_actions() -> Element {
    let button = |action: &'static str, label: &'static str| {
        Element::new("button")
            .attr("type", "button")
            .attr("data-action", action)
            .text(label)
    };

    Element::new("footer")
        .class("actions")
        .child(button("print", "保存 / 打印行程"))
        .child(button("markdown", "导出 Markdown"))
        .child(button("pdf", "导出 PDF"))
        .no_print()
}

use std::sync::Mutex;

use async_trait::async_trait;
use wander_rs::{
    export::{paginate, PageFormat},
    render, to_markdown, BudgetCategory, ExportError, MarkdownExporter, PdfExporter, PrintJob,
    Raster, Rasterizer, RenderOptions, TripActivity, TripDay, TripItinerary, VisualTree,
};

/// Records the text it was asked to draw and returns a blank bitmap of fixed height.
struct RecordingRasterizer {
    height: u32,
    seen: Mutex<Vec<String>>,
}

impl RecordingRasterizer {
    fn new(height: u32) -> Self {
        Self {
            height,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Rasterizer for RecordingRasterizer {
    async fn rasterize(&self, tree: &VisualTree) -> Result<Raster, ExportError> {
        self.seen.lock().unwrap().push(tree.text_content());
        assert_eq!(tree.count_print_excluded(), 0, "rasterizer got interactive nodes");
        Raster::new(190, self.height, vec![255; 190 * self.height as usize * 3])
    }
}

struct FailingRasterizer;

#[async_trait]
impl Rasterizer for FailingRasterizer {
    async fn rasterize(&self, _tree: &VisualTree) -> Result<Raster, ExportError> {
        Err(ExportError::Rasterize("tainted canvas".to_string()))
    }
}

fn itinerary() -> TripItinerary {
    let activity = |time: &str, name: &str| TripActivity {
        time: time.to_string(),
        activity: name.to_string(),
        description: format!("{name}一游"),
        location: "京都".to_string(),
    };

    TripItinerary {
        destination_name: "京都".to_string(),
        trip_title: "京都 古寺巡礼".to_string(),
        summary: "两天看遍东山与岚山".to_string(),
        packing_list: vec!["舒适的鞋".to_string(), "相机".to_string()],
        budget_breakdown: vec![
            BudgetCategory {
                category: "住宿".to_string(),
                amount: 2000.0,
            },
            BudgetCategory {
                category: "餐饮".to_string(),
                amount: 800.0,
            },
            BudgetCategory {
                category: "交通".to_string(),
                amount: 300.0,
            },
        ],
        days: vec![
            TripDay {
                day_number: 1,
                theme: "东山".to_string(),
                activities: vec![activity("09:00", "清水寺"), activity("13:00", "八坂神社")],
            },
            TripDay {
                day_number: 2,
                theme: "岚山".to_string(),
                activities: vec![activity("上午", "竹林小径")],
            },
        ],
    }
}

#[test]
fn test_markdown_leaves_model_untouched() {
    let original = itinerary();
    let model = original.clone();

    let first = MarkdownExporter::new().export(&model);
    let second = MarkdownExporter::new().export(&model);

    assert_eq!(model, original);
    assert_eq!(first, second);
    assert_eq!(first.file_name, "京都_古寺巡礼_攻略.md");
    assert!(String::from_utf8(first.bytes).unwrap().contains("**总计: ¥3100** (约)"));
}

#[test]
fn test_markdown_multi_day_layout() {
    let expected = "# 京都 古寺巡礼\n\
目的地: 京都\n\
简介: 两天看遍东山与岚山\n\
\n\
## 行前准备\n\
- [ ] 舒适的鞋\n\
- [ ] 相机\n\
\n\
## 预算预估 (CNY)\n\
- 住宿: ¥2000\n\
- 餐饮: ¥800\n\
- 交通: ¥300\n\
**总计: ¥3100** (约)\n\
\n\
## 每日行程\n\
### 第 1 天: 东山\n\
#### 09:00 - 清水寺\n\
📍 京都\n\
清水寺一游\n\
#### 13:00 - 八坂神社\n\
📍 京都\n\
八坂神社一游\n\
---\n\
### 第 2 天: 岚山\n\
#### 上午 - 竹林小径\n\
📍 京都\n\
竹林小径一游\n\
---\n";
    assert_eq!(to_markdown(&itinerary()), expected);
}

#[tokio::test]
async fn test_pdf_after_markdown_describes_same_data() {
    let model = itinerary();
    let markdown = to_markdown(&model);

    let document = render(&model, None, &RenderOptions::default());
    let rasterizer = RecordingRasterizer::new(600);
    let exporter = PdfExporter::new(rasterizer);
    let file = exporter.export(&document).await.unwrap();

    assert_eq!(file.file_name, "京都_古寺巡礼_攻略.pdf");
    assert!(file.bytes.starts_with(b"%PDF"));
    assert_eq!(to_markdown(&model), markdown);
}

#[test]
fn test_rasterized_tree_keeps_order_and_totals() {
    let model = itinerary();
    let document = render(&model, None, &RenderOptions::default());
    let rasterizer = RecordingRasterizer::new(300);

    let exporter = PdfExporter::new(&rasterizer);
    tokio_test::block_on(exporter.export(&document)).unwrap();

    let seen = rasterizer.seen.lock().unwrap();
    let text = &seen[0];
    assert!(text.contains("¥3,100"));
    let positions: Vec<usize> = ["清水寺", "八坂神社", "竹林小径"]
        .iter()
        .map(|name| text.find(name).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(!text.contains("重新规划"));
    assert!(!text.contains("您的专属行程"));
}

#[tokio::test]
async fn test_failed_rasterization_advises_print_export() {
    let document = render(&itinerary(), None, &RenderOptions::default());
    let err = PdfExporter::new(FailingRasterizer)
        .export(&document)
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "RASTERIZE_ERROR");
    assert!(err.advisory().contains("保存 / 打印行程"));
}

#[tokio::test]
async fn test_concurrent_exports_are_independent() {
    let model = itinerary();
    let document = render(&model, None, &RenderOptions::default());
    let rasterizer = RecordingRasterizer::new(100);
    let exporter = PdfExporter::new(&rasterizer);

    let (a, b) = tokio::join!(exporter.export(&document), exporter.export(&document));
    assert_eq!(a.unwrap().file_name, b.unwrap().file_name);

    let seen = rasterizer.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[test]
fn test_print_job_keeps_interactive_nodes_for_screen() {
    let document = render(&itinerary(), None, &RenderOptions::default());
    let job = PrintJob::from_document(&document);
    assert!(job.html.contains("重新规划"));
    assert!(job.html.contains("no-print"));
    assert_eq!(job.file_name, "京都_古寺巡礼_攻略.html");
}

#[test]
fn test_a4_page_count() {
    assert_eq!(paginate(950, 1385, &PageFormat::A4).unwrap().len(), 1);
    assert_eq!(paginate(950, 4000, &PageFormat::A4).unwrap().len(), 3);
}

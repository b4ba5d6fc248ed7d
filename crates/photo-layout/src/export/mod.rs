//! PDF export of a project
//!
//! 1. Snapshot every page: layout, title, slot texts and the JPEG of each
//!    filled slot (fetched through the raster backend)
//! 2. Compute page geometry from the export options
//! 3. Write pages with image XObjects, annotation overlays and text

mod draw;
mod geometry;
mod io;

pub use draw::{parse_color, pdf_string};
pub use geometry::*;
pub use io::{pdf_bytes, save_pdf};

use crate::annotation::Annotation;
use crate::geometry::OriginalSpace;
use crate::options::ExportOptions;
use crate::pages::Layout;
use crate::project::Project;
use crate::raster::{JpegImage, RasterBackend};
use crate::types::*;
use draw::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// A filled slot ready to be drawn
#[derive(Debug, Clone)]
struct SlotImage {
    jpeg: JpegImage,
    /// Original pixel size the annotations refer to
    frame: (f32, f32),
    rotation: i32,
    annotations: Vec<Annotation<OriginalSpace>>,
}

#[derive(Debug, Clone)]
struct SlotPlan {
    image: Option<SlotImage>,
    text: String,
}

#[derive(Debug, Clone)]
struct PagePlan {
    layout: Layout,
    title: Option<String>,
    number: u32,
    slots: Vec<SlotPlan>,
}

/// Export every page of `project` into a new PDF document.
///
/// A photo whose image cannot be read is logged and exported as an empty
/// slot rather than failing the whole export.
pub async fn export_pdf<B: RasterBackend>(
    project: &Project,
    backend: &B,
    options: &ExportOptions,
) -> Result<Document> {
    options.validate()?;

    let plans = plan_pages(project, backend, options).await?;
    if plans.is_empty() {
        return Err(LayoutError::NoPages);
    }

    let options = options.clone();
    let doc = tokio::task::spawn_blocking(move || build_document(&plans, &options)).await??;
    log::info!("Exported {} page(s)", doc.get_pages().len());
    Ok(doc)
}

async fn plan_pages<B: RasterBackend>(
    project: &Project,
    backend: &B,
    options: &ExportOptions,
) -> Result<Vec<PagePlan>> {
    let mut plans = Vec::new();

    for page in project.pages() {
        let mut slots = Vec::with_capacity(page.photos.len());
        for (i, photo) in page.photos.iter().enumerate() {
            let text = page.texts.get(i).map(|t| t.to_string()).unwrap_or_default();
            if photo.is_empty || photo.src.is_empty() {
                slots.push(SlotPlan { image: None, text });
                continue;
            }

            let image = match backend.to_jpeg(&photo.src, options.jpeg_quality).await {
                Ok(jpeg) => {
                    let frame = photo
                        .original_size()
                        .map(|s| (s.width as f32, s.height as f32))
                        .unwrap_or((jpeg.width as f32, jpeg.height as f32));
                    Some(SlotImage {
                        jpeg,
                        frame,
                        rotation: project.rotation(&photo.id),
                        annotations: photo.annotations.clone(),
                    })
                }
                Err(e) => {
                    log::warn!("Skipping image of {}: {}", photo.name, e);
                    None
                }
            };
            slots.push(SlotPlan { image, text });
        }
        // Frames for the unfilled slots of a partial page
        slots.extend((0..page.empty_slots()).map(|_| SlotPlan {
            image: None,
            text: String::new(),
        }));

        let page_index = page.page_index();
        plans.push(PagePlan {
            layout: page.layout(),
            title: page.title.map(str::to_string),
            number: project
                .start_page_number()
                .saturating_add(page_index as u32),
            slots,
        });
    }

    Ok(plans)
}

fn build_document(plans: &[PagePlan], options: &ExportOptions) -> Result<Document> {
    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();

    let font_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));

    let mut page_refs = Vec::with_capacity(plans.len());
    for plan in plans {
        let page_id = render_page(&mut output, plan, options, pages_tree_id, font_id)?;
        page_refs.push(Object::Reference(page_id));
    }

    // Create pages tree
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);

    Ok(output)
}

fn render_page(
    output: &mut Document,
    plan: &PagePlan,
    options: &ExportOptions,
    parent_pages_id: ObjectId,
    font_id: ObjectId,
) -> Result<ObjectId> {
    let geometry = PageGeometry::new(options, plan.layout, plan.title.is_some());

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(geometry.width),
            Object::Real(geometry.height),
        ]),
    );

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();

    if let (Some(title), Some(band)) = (&plan.title, &geometry.title) {
        content_ops.push(title_ops(title, band, options.title_font_size));
    }

    for (idx, (slot, cell)) in plan.slots.iter().zip(&geometry.slots).enumerate() {
        match &slot.image {
            Some(image) => {
                let name = format!("Im{}", idx);
                let image_id = output.add_object(image_xobject(&image.jpeg));
                xobjects.set(name.as_bytes(), Object::Reference(image_id));

                let (w, h) = image.frame;
                let fit = fit_image(w, h, image.rotation, &cell.photo);
                content_ops.push(image_ops(
                    &name,
                    &fit,
                    w,
                    h,
                    &image.annotations,
                    options.direction,
                ));
            }
            None => content_ops.push(placeholder_ops(&cell.photo)),
        }

        if let Some(text_rect) = &cell.text {
            if !slot.text.is_empty() {
                content_ops.push(text_box_ops(
                    &slot.text,
                    text_rect,
                    options.text_font_size,
                    options.direction,
                ));
            }
        }
    }

    if options.page_numbers {
        content_ops.push(page_number_ops(plan.number, geometry.width));
    }

    // Set up resources
    let mut fonts = Dictionary::new();
    fonts.set(FONT_NAME, Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    if !xobjects.is_empty() {
        resources.set("XObject", Object::Dictionary(xobjects));
    }

    // Create content stream
    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

/// JPEG image XObject; the data is embedded as is
fn image_xobject(jpeg: &JpegImage) -> Stream {
    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(jpeg.width as i64)),
        ("Height", Object::Integer(jpeg.height as i64)),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"DCTDecode".to_vec())),
    ]);
    Stream::new(dict, jpeg.data.clone()).with_compression(false)
}

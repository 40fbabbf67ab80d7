use std::cell::RefCell;
use std::rc::Rc;

use glam::{Affine2, Vec2};
use lanyard::band::{BandVariant, Scene, SceneConfig};
use lanyard::core::LanyardError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasPattern, CanvasRenderingContext2d, Document, Event, EventTarget, HtmlCanvasElement, HtmlElement,
    HtmlImageElement, HtmlInputElement, PointerEvent, Response, Window,
};

use crate::assets::{inspect_card_model, AssetState};
use crate::paint::{paint_frame, Surface, RIBBON_COLOR};

const CANVAS_ID: &str = "lanyard";

fn to_js(err: LanyardError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    pattern: Option<CanvasPattern>,
}

impl CanvasSurface {
    fn path(&self, points: &[Vec2]) {
        self.ctx.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(p.x as f64, p.y as f64);
            } else {
                self.ctx.line_to(p.x as f64, p.y as f64);
            }
        }
        self.ctx.close_path();
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32, color: &str) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: &str, alpha: f32) {
        if points.len() < 3 {
            return;
        }
        self.path(points);
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: &str, width: f32) {
        self.path(points);
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(color);
        self.ctx.stroke();
    }

    fn fill_textured_triangle(&mut self, triangle: [Vec2; 3], texture_to_screen: Affine2, texture_rect: (Vec2, Vec2), alpha: f32) {
        let Some(pattern) = self.pattern.as_ref() else {
            self.fill_polygon(&triangle, RIBBON_COLOR, alpha);
            return;
        };

        self.ctx.save();
        self.path(&triangle);
        self.ctx.clip();

        let m = texture_to_screen.matrix2;
        let t = texture_to_screen.translation;
        let mapped = self.ctx.transform(
            m.x_axis.x as f64,
            m.x_axis.y as f64,
            m.y_axis.x as f64,
            m.y_axis.y as f64,
            t.x as f64,
            t.y as f64,
        );
        if mapped.is_ok() {
            self.ctx.set_global_alpha(alpha as f64);
            self.ctx.set_fill_style_canvas_pattern(pattern);
            // one texel of padding closes the seams between neighbouring triangles
            let (min, max) = texture_rect;
            self.ctx.fill_rect(
                (min.x - 1.0) as f64,
                (min.y - 1.0) as f64,
                (max.x - min.x + 2.0) as f64,
                (max.y - min.y + 2.0) as f64,
            );
        }
        self.ctx.restore();
    }

    fn stroke_line(&mut self, start: Vec2, end: Vec2, color: &str, width: f32) {
        self.ctx.begin_path();
        self.ctx.move_to(start.x as f64, start.y as f64);
        self.ctx.line_to(end.x as f64, end.y as f64);
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(color);
        self.ctx.stroke();
    }
}

struct App {
    document: Document,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    scene: Scene,
    texture: Option<HtmlImageElement>,
    texture_state: AssetState,
    last_time: Option<f64>,
}

impl App {
    fn resize(&mut self) {
        let width = self.canvas.client_width().max(1) as u32;
        let height = self.canvas.client_height().max(1) as u32;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.scene.resize(width, height);
    }

    fn apply_cursor(&mut self) {
        let Some(style) = self.scene.take_cursor_change() else {
            return;
        };
        if let Some(body) = self.document.body() {
            if let Err(err) = body.style().set_property("cursor", style.as_css()) {
                log::warn!("Failed to set cursor: {err:?}");
            }
        }
    }

    fn frame(&mut self, timestamp: f64) {
        let delta = self
            .last_time
            .map(|last| ((timestamp - last) / 1000.0) as f32)
            .unwrap_or(0.0);
        self.last_time = Some(timestamp);

        self.scene.tick(delta);

        let frame = self.scene.frame_data();
        let viewport = self.scene.viewport();
        let texture_size = self
            .texture
            .as_ref()
            .filter(|_| self.texture_state.is_ready())
            .map(|img| Vec2::new(img.natural_width() as f32, img.natural_height() as f32));
        paint_frame(&mut self.surface, &frame, viewport.resolution(), texture_size);
    }
}

fn on_pointer(target: &EventTarget, name: &str, f: impl FnMut(PointerEvent) + 'static) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(PointerEvent)>::wrap(Box::new(f));
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_event(target: &EventTarget, name: &str, f: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(f));
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn init_canvas(document: &Document) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let canvas = match document.get_element_by_id(CANVAS_ID) {
        Some(el) => el.dyn_into::<HtmlCanvasElement>()?,
        None => {
            let canvas = document.create_element("canvas")?.dyn_into::<HtmlCanvasElement>()?;
            canvas.set_id(CANVAS_ID);
            canvas.style().set_property("width", "100vw")?;
            canvas.style().set_property("height", "100vh")?;
            canvas.style().set_property("display", "block")?;
            canvas.style().set_property("touch-action", "none")?;
            document
                .body()
                .ok_or("document has no body")?
                .append_child(&canvas)?;
            canvas
        }
    };
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((canvas, ctx))
}

fn install_pointer_handlers(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let canvas: EventTarget = app.borrow().canvas.clone().into();

    let st = app.clone();
    on_pointer(&canvas, "pointerdown", move |e| {
        let mut app = st.borrow_mut();
        let (x, y) = (e.offset_x() as f32, e.offset_y() as f32);
        if app.scene.pointer_down(x, y, e.pointer_id()) {
            if let Err(err) = app.canvas.set_pointer_capture(e.pointer_id()) {
                log::warn!("Pointer capture failed: {err:?}");
            }
        }
        app.apply_cursor();
    })?;

    let st = app.clone();
    on_pointer(&canvas, "pointermove", move |e| {
        let mut app = st.borrow_mut();
        app.scene.pointer_move(e.offset_x() as f32, e.offset_y() as f32);
        app.apply_cursor();
    })?;

    for name in ["pointerup", "pointercancel"] {
        let st = app.clone();
        on_pointer(&canvas, name, move |e| {
            let mut app = st.borrow_mut();
            if app.scene.pointer_up(e.pointer_id()) {
                let _ = app.canvas.release_pointer_capture(e.pointer_id());
            }
            app.apply_cursor();
        })?;
    }

    let st = app.clone();
    on_pointer(&canvas, "pointerleave", move |_| {
        let mut app = st.borrow_mut();
        app.scene.pointer_leave();
        app.apply_cursor();
    })?;

    Ok(())
}

fn install_resize(window: &Window, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let st = app.clone();
    on_event(window, "resize", move |_| st.borrow_mut().resize())
}

fn add_checkbox(document: &Document, panel: &HtmlElement, id: &str, label: &str, checked: bool) -> Result<HtmlInputElement, JsValue> {
    let input = document.create_element("input")?.dyn_into::<HtmlInputElement>()?;
    input.set_type("checkbox");
    input.set_id(id);
    input.set_checked(checked);

    let label_el = document.create_element("label")?;
    label_el.append_child(&input)?;
    label_el.append_child(&document.create_text_node(label))?;
    panel.append_child(&label_el)?;
    Ok(input)
}

/// The `debug` / `raw` control panel in the top-right corner.
fn install_controls(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let (document, debug, raw) = {
        let app = app.borrow();
        (
            app.document.clone(),
            app.scene.debug(),
            app.scene.variant() == BandVariant::Raw,
        )
    };

    let panel = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    let style = panel.style();
    style.set_property("position", "fixed")?;
    style.set_property("top", "12px")?;
    style.set_property("right", "12px")?;
    style.set_property("display", "flex")?;
    style.set_property("flex-direction", "column")?;
    style.set_property("gap", "4px")?;
    style.set_property("padding", "8px 12px")?;
    style.set_property("background", "rgba(20, 20, 24, 0.85)")?;
    style.set_property("color", "#e0e0e6")?;
    style.set_property("font", "12px monospace")?;
    style.set_property("border-radius", "6px")?;
    document.body().ok_or("document has no body")?.append_child(&panel)?;

    let debug_input = add_checkbox(&document, &panel, "lanyard-debug", " Enable Debug Mode", debug)?;
    let st = app.clone();
    let input = debug_input.clone();
    on_event(&debug_input, "change", move |_| {
        st.borrow_mut().scene.set_debug(input.checked());
    })?;

    let raw_input = add_checkbox(&document, &panel, "lanyard-raw", " Show Raw Band", raw)?;
    let st = app.clone();
    let input = raw_input.clone();
    on_event(&raw_input, "change", move |_| {
        let variant = if input.checked() { BandVariant::Raw } else { BandVariant::Full };
        let mut app = st.borrow_mut();
        if let Err(err) = app.scene.set_variant(variant) {
            log::error!("Switching band variant failed: {err}");
        }
        app.apply_cursor();
    })?;

    Ok(())
}

fn load_texture(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let url = app.borrow().scene.config().band.assets.band_texture.clone();
    let img = HtmlImageElement::new()?;
    img.set_cross_origin(Some("anonymous"));

    let st = app.clone();
    let loaded = img.clone();
    let onload = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let mut app = st.borrow_mut();
        match app.surface.ctx.create_pattern_with_html_image_element(&loaded, "repeat") {
            Ok(Some(pattern)) => {
                app.surface.pattern = Some(pattern);
                app.texture_state = AssetState::Ready;
                log::info!("Band texture loaded ({}x{})", loaded.natural_width(), loaded.natural_height());
            }
            Ok(None) | Err(_) => {
                app.texture_state = AssetState::Failed("could not create pattern".into());
                log::error!("Band texture loaded but no pattern could be created");
            }
        }
    }));
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    let st = app.clone();
    let failed_url = url.clone();
    let onerror = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let result: lanyard::core::Result<()> = Err(LanyardError::AssetLoad(format!("band texture {failed_url}")));
        let state = AssetState::from_result(&result);
        log::error!("{state:?}");
        st.borrow_mut().texture_state = state;
    }));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    img.set_src(&url);
    app.borrow_mut().texture = Some(img);
    Ok(())
}

async fn fetch_bytes(window: &Window, url: &str) -> Result<Vec<u8>, JsValue> {
    let response: Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }
    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Fetches and parses the card model. The card is drawn as a flat face either
/// way; a bad model is only reported.
fn load_model(window: Window, app: &Rc<RefCell<App>>) {
    let url = app.borrow().scene.config().band.assets.card_model.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = match fetch_bytes(&window, &url).await {
            Ok(bytes) => inspect_card_model(&bytes),
            Err(err) => Err(LanyardError::AssetLoad(format!("{url}: {err:?}"))),
        };
        if let Ok(model) = &result {
            log::info!(
                "Card model loaded: {} meshes, {} nodes, {} byte blob",
                model.meshes,
                model.nodes,
                model.blob_len
            );
        }
        if let AssetState::Failed(msg) = AssetState::from_result(&result) {
            log::error!("Card model failed to load: {msg}");
        }
    });
}

fn start_loop(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    type RafClosure = Closure<dyn FnMut(f64)>;
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        app.borrow_mut().frame(timestamp);

        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(cb) = f.borrow().as_ref() {
            if let Err(err) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    let window = web_sys::window().ok_or("no window")?;
    if let Some(cb) = g.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    crate::init_logging();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;
    let scene = Scene::new(SceneConfig::default()).map_err(to_js)?;

    let app = Rc::new(RefCell::new(App {
        document,
        canvas,
        surface: CanvasSurface { ctx, pattern: None },
        scene,
        texture: None,
        texture_state: AssetState::Pending,
        last_time: None,
    }));
    app.borrow_mut().resize();

    install_pointer_handlers(&app)?;
    install_resize(&window, &app)?;
    install_controls(&app)?;
    load_texture(&app)?;
    load_model(window, &app);
    start_loop(app)?;

    log::info!("lanyard started");
    Ok(())
}

//! The demo flow: acquire a context, fetch both shader sources in order,
//! compile and link them, then draw one point.
//!
//! Every failure ends the flow in [`FlowState::Failed`]; nothing is retried.
//! The two fetches are awaited one after the other, so the fragment locator
//! is not even resolved until the vertex source has arrived. A fetch that
//! never completes leaves the flow suspended.

use crate::config::{DemoConfig, SourceLocator};
use crate::error::DemoError;
use crate::fetch::SourceFetcher;
use crate::notify::Notifier;
use crate::render::{init_shaders, render_frame, FrameSpec, RenderApi};
use crate::state::{Flow, FlowState};
use crate::surface::SurfaceHost;

/// The result of one run.
pub struct Outcome<C: RenderApi> {
    /// Final state: `Rendered` or `Failed`.
    pub state: FlowState,
    /// Every state visited, starting with `Idle`.
    pub history: Vec<FlowState>,
    /// The context, if one was acquired.
    pub context: Option<C>,
    /// The linked program left in use, if linking succeeded.
    pub program: Option<C::Program>,
    /// The error that ended the flow, if it failed.
    pub error: Option<DemoError>,
}

impl<C: RenderApi> Outcome<C> {
    pub fn is_rendered(&self) -> bool {
        self.state == FlowState::Rendered
    }
}

/// Runs the whole flow once.
///
/// Failures are logged; compile and link failures are additionally passed to
/// `notifier` as user-facing alerts. The returned [`Outcome`] says how far
/// the flow got.
pub async fn run<H, F, N>(
    config: &DemoConfig,
    host: &H,
    fetcher: &F,
    notifier: &N,
) -> Outcome<H::Context>
where
    H: SurfaceHost + ?Sized,
    F: SourceFetcher + ?Sized,
    N: Notifier + ?Sized,
{
    let mut flow = Flow::new();
    let mut context = None;

    match drive(config, host, fetcher, notifier, &mut flow, &mut context).await {
        Ok(program) => {
            log::info!("rendered a single point on '{}'", config.surface_id);
            Outcome {
                state: flow.state(),
                history: flow.into_history(),
                context,
                program: Some(program),
                error: None,
            }
        }
        Err(error) => {
            flow.fail();
            Outcome {
                state: flow.state(),
                history: flow.into_history(),
                context,
                program: None,
                error: Some(error),
            }
        }
    }
}

async fn drive<H, F, N>(
    config: &DemoConfig,
    host: &H,
    fetcher: &F,
    notifier: &N,
    flow: &mut Flow,
    context: &mut Option<H::Context>,
) -> Result<<H::Context as RenderApi>::Program, DemoError>
where
    H: SurfaceHost + ?Sized,
    F: SourceFetcher + ?Sized,
    N: Notifier + ?Sized,
{
    if let Err(e) = config.validate() {
        log::error!("{e}");
        return Err(e.into());
    }

    let gl = match host.acquire_context(&config.surface_id) {
        Ok(gl) => gl,
        Err(e) => {
            log::error!("failed to get the rendering context: {e}");
            return Err(e.into());
        }
    };
    flow.advance(FlowState::ContextAcquired)?;
    let gl = &*context.insert(gl);

    let vertex_src = fetch_source(fetcher, "vertex", &config.vertex_shader).await?;
    let fragment_src = fetch_source(fetcher, "fragment", &config.fragment_shader).await?;
    flow.advance(FlowState::ShadersFetched)?;

    let program = match init_shaders(gl, &vertex_src, &fragment_src) {
        Ok(program) => program,
        Err(e) => {
            notifier.alert(&e.alert_message());
            log::error!("failed to initialize shaders");
            return Err(e.into());
        }
    };
    flow.advance(FlowState::ProgramLinked)?;

    render_frame(gl, &FrameSpec::default());
    flow.advance(FlowState::Rendered)?;

    Ok(program)
}

async fn fetch_source<F: SourceFetcher + ?Sized>(
    fetcher: &F,
    stage: &str,
    locator: &SourceLocator,
) -> Result<String, DemoError> {
    let fetched = match fetcher.resolve(locator) {
        Ok(uri) => {
            log::info!("fetching {stage} shader from {uri}");
            fetcher.fetch_text(&uri).await
        }
        Err(e) => Err(e),
    };
    fetched.map_err(|e| {
        log::error!("failed to load {stage} shader: {e}");
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ContextError, FetchError};
    use crate::render::recording::HeadlessHost;
    use crate::render::{ClearColor, Primitive, ShaderError, ShaderStage};
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    const VERTEX: &str = "void main() { gl_Position = vec4(0.0, 0.0, 0.0, 1.0); gl_PointSize = 10.0; }";
    const FRAGMENT: &str = "void main() { gl_FragColor = vec4(1.0, 0.0, 0.0, 1.0); }";

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum FetchEvent {
        Resolved(String),
        Requested(String),
        Completed(String),
    }

    /// Returns `Pending` once before completing, so every fetch really
    /// suspends the flow.
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    #[derive(Default)]
    struct ScriptedFetcher {
        bodies: HashMap<String, Result<String, FetchError>>,
        elements: HashMap<String, String>,
        events: RefCell<Vec<FetchEvent>>,
    }

    impl ScriptedFetcher {
        fn serving(vertex: &str, fragment: &str) -> Self {
            let mut fetcher = Self::default();
            fetcher.bodies.insert("point.vert".into(), Ok(vertex.into()));
            fetcher
                .bodies
                .insert("point.frag".into(), Ok(fragment.into()));
            fetcher
        }

        fn events(&self) -> Vec<FetchEvent> {
            self.events.borrow().clone()
        }

        fn requests(&self) -> usize {
            self.events()
                .iter()
                .filter(|e| matches!(e, FetchEvent::Requested(_)))
                .count()
        }
    }

    #[async_trait(?Send)]
    impl SourceFetcher for ScriptedFetcher {
        fn resolve(&self, locator: &SourceLocator) -> Result<String, FetchError> {
            self.events
                .borrow_mut()
                .push(FetchEvent::Resolved(locator.to_string()));
            match locator {
                SourceLocator::Uri(uri) => Ok(uri.clone()),
                SourceLocator::Element(id) => self
                    .elements
                    .get(id)
                    .cloned()
                    .ok_or_else(|| FetchError::Unresolved(locator.to_string())),
            }
        }

        async fn fetch_text(&self, uri: &str) -> Result<String, FetchError> {
            self.events
                .borrow_mut()
                .push(FetchEvent::Requested(uri.to_owned()));
            YieldOnce(false).await;
            let result = self.bodies.get(uri).cloned().unwrap_or(Err(FetchError::Status {
                uri: uri.to_owned(),
                status: 404,
            }));
            self.events
                .borrow_mut()
                .push(FetchEvent::Completed(uri.to_owned()));
            result
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_owned());
        }
    }

    fn uri_config() -> DemoConfig {
        DemoConfig::with_uris("myCanvas", "point.vert", "point.frag")
    }

    #[test]
    fn end_to_end_draws_exactly_one_point() {
        let host = HeadlessHost::new(["myCanvas"]);
        let fetcher = ScriptedFetcher::serving(VERTEX, FRAGMENT);
        let notifier = RecordingNotifier::default();

        let outcome = block_on(run(&uri_config(), &host, &fetcher, &notifier));

        assert!(outcome.is_rendered(), "error: {:?}", outcome.error);
        assert_eq!(
            outcome.history,
            vec![
                FlowState::Idle,
                FlowState::ContextAcquired,
                FlowState::ShadersFetched,
                FlowState::ProgramLinked,
                FlowState::Rendered,
            ]
        );
        let gl = outcome.context.expect("context acquired");
        assert_eq!(gl.last_clear_color(), Some(ClearColor::OPAQUE_BLACK));
        assert_eq!(gl.draw_calls(), vec![(Primitive::Points, 0, 1)]);
        assert_eq!(gl.active_program(), outcome.program);
        assert!(notifier.alerts.borrow().is_empty());
    }

    #[test]
    fn bundled_shader_files_render_one_point() {
        let host = HeadlessHost::new(["myCanvas"]);
        let fetcher =
            crate::fetch::FileFetcher::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../.."));
        let notifier = RecordingNotifier::default();
        let config = DemoConfig::with_uris("myCanvas", "shaders/point.vert", "shaders/point.frag");

        let outcome = block_on(run(&config, &host, &fetcher, &notifier));

        assert_eq!(outcome.state, FlowState::Rendered, "error: {:?}", outcome.error);
        assert!(outcome.error.is_none());
        let gl = outcome.context.expect("context acquired");
        assert_eq!(gl.draw_calls(), vec![(Primitive::Points, 0, 1)]);
        assert!(notifier.alerts.borrow().is_empty());
    }

    #[test]
    fn fragment_fetch_waits_for_vertex_fetch() {
        let host = HeadlessHost::new(["myCanvas"]);
        let fetcher = ScriptedFetcher::serving(VERTEX, FRAGMENT);

        let _ = block_on(run(&uri_config(), &host, &fetcher, &RecordingNotifier::default()));

        assert_eq!(
            fetcher.events(),
            vec![
                FetchEvent::Resolved("point.vert".into()),
                FetchEvent::Requested("point.vert".into()),
                FetchEvent::Completed("point.vert".into()),
                FetchEvent::Resolved("point.frag".into()),
                FetchEvent::Requested("point.frag".into()),
                FetchEvent::Completed("point.frag".into()),
            ]
        );
    }

    #[test]
    fn missing_surface_skips_fetches_and_drawing() {
        let host = HeadlessHost::new(["elsewhere"]);
        let fetcher = ScriptedFetcher::serving(VERTEX, FRAGMENT);

        let outcome = block_on(run(&uri_config(), &host, &fetcher, &RecordingNotifier::default()));

        assert_eq!(outcome.state, FlowState::Failed);
        assert_eq!(outcome.history, vec![FlowState::Idle, FlowState::Failed]);
        assert!(outcome.context.is_none());
        assert!(fetcher.events().is_empty(), "no fetch may be attempted");
        assert_eq!(
            outcome.error,
            Some(DemoError::Context(ContextError::SurfaceNotFound(
                "myCanvas".into()
            )))
        );
    }

    #[test]
    fn vertex_syntax_error_alerts_and_never_draws() {
        let host = HeadlessHost::new(["myCanvas"]);
        let fetcher = ScriptedFetcher::serving("void main() { gl_Position = vec4(0.0;", FRAGMENT);
        let notifier = RecordingNotifier::default();

        let outcome = block_on(run(&uri_config(), &host, &fetcher, &notifier));

        assert_eq!(outcome.state, FlowState::Failed);
        assert!(outcome.program.is_none());
        let gl = outcome.context.expect("context acquired");
        assert_eq!(gl.active_program(), None);
        assert!(gl.draw_calls().is_empty());
        assert!(matches!(
            outcome.error,
            Some(DemoError::Shader(ShaderError::CompileError {
                stage: ShaderStage::Vertex,
                ..
            }))
        ));
        let alerts = notifier.alerts.borrow();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Error compiling shader:"), "got {}", alerts[0]);
    }

    #[test]
    fn link_failure_alerts_with_program_log() {
        let host = HeadlessHost::new(["myCanvas"]).with_link_failure("varying v_color not written");
        let fetcher = ScriptedFetcher::serving(VERTEX, FRAGMENT);
        let notifier = RecordingNotifier::default();

        let outcome = block_on(run(&uri_config(), &host, &fetcher, &notifier));

        assert_eq!(
            outcome.history,
            vec![
                FlowState::Idle,
                FlowState::ContextAcquired,
                FlowState::ShadersFetched,
                FlowState::Failed,
            ]
        );
        assert!(outcome.context.expect("context").draw_calls().is_empty());
        let alerts = notifier.alerts.borrow();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("varying v_color not written"));
    }

    #[test]
    fn failed_vertex_fetch_never_requests_fragment() {
        let host = HeadlessHost::new(["myCanvas"]);
        let mut fetcher = ScriptedFetcher::serving(VERTEX, FRAGMENT);
        fetcher.bodies.remove("point.vert");

        let outcome = block_on(run(&uri_config(), &host, &fetcher, &RecordingNotifier::default()));

        assert_eq!(outcome.state, FlowState::Failed);
        assert_eq!(fetcher.requests(), 1);
        assert!(matches!(
            outcome.error,
            Some(DemoError::Fetch(FetchError::Status { status: 404, .. }))
        ));
        assert!(outcome.context.expect("context").draw_calls().is_empty());
    }

    #[test]
    fn element_locators_resolve_lazily() {
        let host = HeadlessHost::new(["myCanvas"]);
        let mut fetcher = ScriptedFetcher::serving(VERTEX, FRAGMENT);
        fetcher
            .elements
            .insert("shaderVs".into(), "point.vert".into());
        fetcher
            .elements
            .insert("shaderFs".into(), "point.frag".into());

        let outcome = block_on(run(
            &DemoConfig::default(),
            &host,
            &fetcher,
            &RecordingNotifier::default(),
        ));

        assert!(outcome.is_rendered(), "error: {:?}", outcome.error);
        let events = fetcher.events();
        let fs_resolved = events
            .iter()
            .position(|e| *e == FetchEvent::Resolved("#shaderFs".into()))
            .unwrap();
        let vs_completed = events
            .iter()
            .position(|e| *e == FetchEvent::Completed("point.vert".into()))
            .unwrap();
        assert!(vs_completed < fs_resolved);
    }

    #[test]
    fn invalid_config_fails_before_acquiring_context() {
        let host = HeadlessHost::new([""]);
        let fetcher = ScriptedFetcher::serving(VERTEX, FRAGMENT);
        let config = DemoConfig::with_uris("", "point.vert", "point.frag");

        let outcome = block_on(run(&config, &host, &fetcher, &RecordingNotifier::default()));

        assert!(outcome.context.is_none());
        assert!(matches!(outcome.error, Some(DemoError::Config(_))));
    }
}

//! The event loop: owns the model, drives `init`/`update`/`view`, and wires
//! the terminal, decoder, and mouse enricher together.

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Mutex};

use crate::buffer::Buffer;
use crate::command::{Cmd, Msg};
use crate::decode::Decoder;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::mouse::MouseEnricher;
use crate::options::ProgramOptions;
use crate::renderer::Renderer;
use crate::style::Style;
use crate::terminal::Terminal;
use crate::text::Preprocessor;

/// The Model-Update-View contract an application implements.
///
/// `init` supplies the initial model value together with its startup
/// [`Cmd`] — a pragmatic widening of "init() -> Cmd": Rust's trait system
/// needs a concrete constructor, so the initial model is returned alongside
/// the command rather than assumed to exist already.
pub trait Model: Sized {
    /// The application's own message type, carried inside [`Msg::User`].
    type Msg: Send + 'static;

    /// Build the initial model and its startup command.
    fn init() -> (Self, Cmd<Self::Msg>);

    /// Handle one message, producing the next model value and a command.
    /// Pure: takes ownership of `self`, returns ownership of the successor.
    fn update(self, msg: Msg<Self::Msg>) -> (Self, Cmd<Self::Msg>);

    /// Render the current model to a string. Pure; may embed ANSI styling
    /// escape sequences (uncommon — prefer [`crate::style::Style`] driving
    /// the renderer instead) but ordinarily just plain text lines.
    fn view(&self) -> String;

    /// Logical cursor position, in `(x, y)` buffer coordinates, to report to
    /// the terminal after each render. `None` (the default) parks the
    /// cursor at the bottom-left corner of the frame, which suits the
    /// common case of an application with no editable cursor of its own.
    fn cursor_position(&self) -> Option<(u16, u16)> {
        None
    }
}

/// A live handle to a running [`Program`]: lets other tasks enqueue
/// messages or request a stop without owning the loop itself.
pub struct ProgramHandle<M> {
    tx: mpsc::UnboundedSender<Msg<M>>,
    running: Arc<AtomicBool>,
}

impl<M> Clone for ProgramHandle<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            running: Arc::clone(&self.running),
        }
    }
}

impl<M> ProgramHandle<M> {
    /// Enqueue a message as if it arrived from the terminal.
    pub fn send(&self, msg: Msg<M>) -> Result<()> {
        self.tx.send(msg).map_err(|_| Error::NotRunning)
    }

    /// Request the loop stop after its current render.
    pub fn stop(&self) -> Result<()> {
        self.send(Msg::Quit)
    }

    /// Whether the loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Owns the terminal and runs the Model-Update-View loop to completion.
pub struct Program<M: Model, T: Terminal> {
    terminal: Arc<Mutex<T>>,
    options: ProgramOptions,
    tx: mpsc::UnboundedSender<Msg<M::Msg>>,
    rx: mpsc::UnboundedReceiver<Msg<M::Msg>>,
    running: Arc<AtomicBool>,
    reading_paused: Arc<AtomicBool>,
    view_panics: u8,
}

/// Restores terminal state on drop if `armed`, best-effort, so a panic that
/// unwinds straight out of [`Program::drive`] doesn't leave the terminal in
/// raw/alt-screen mode. The non-panicking path disarms this and runs
/// [`Program::teardown`] explicitly instead, since that can properly await
/// the terminal lock; this guard exists only for the unwind case, where no
/// `.await` point is reachable.
struct TeardownGuard<T: Terminal + Send + 'static> {
    terminal: Arc<Mutex<T>>,
    alt_screen: bool,
    armed: bool,
}

impl<T: Terminal + Send + 'static> Drop for TeardownGuard<T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let terminal = Arc::clone(&self.terminal);
        let alt_screen = self.alt_screen;
        tokio::spawn(async move {
            let mut term = terminal.lock().await;
            let _ = term.show_cursor();
            if alt_screen {
                let _ = term.exit_alt_screen();
            }
            let _ = term.exit_raw_mode();
        });
    }
}

impl<M, T> Program<M, T>
where
    M: Model,
    M::Msg: Send + fmt::Debug + 'static,
    T: Terminal + Send + 'static,
{
    /// Construct a program bound to `terminal` with the given options. The
    /// loop does not start until [`Program::run`] is called.
    #[must_use]
    pub fn new(terminal: T, options: ProgramOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            terminal: Arc::new(Mutex::new(terminal)),
            options,
            tx,
            rx,
            running: Arc::new(AtomicBool::new(false)),
            reading_paused: Arc::new(AtomicBool::new(false)),
            view_panics: 0,
        }
    }

    /// A handle that can `send`/`stop`/check `is_running` from elsewhere.
    #[must_use]
    pub fn handle(&self) -> ProgramHandle<M::Msg> {
        ProgramHandle {
            tx: self.tx.clone(),
            running: Arc::clone(&self.running),
        }
    }

    /// Run the loop to completion, returning the final model.
    ///
    /// Lifecycle: enter raw mode (and alt-screen, if configured), hide the
    /// cursor, call `M::init`, render the first frame, then dispatch
    /// messages — from decoded input, fired commands, and
    /// [`ProgramHandle::send`] — until a `Quit` message is processed.
    /// Teardown (show cursor, leave alt-screen, restore terminal mode)
    /// always runs, even if the loop exits via an error.
    pub async fn run(mut self) -> Result<M> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(Error::AlreadyRunning);
        }

        let setup = self.setup().await;
        let mut guard = TeardownGuard {
            terminal: Arc::clone(&self.terminal),
            alt_screen: self.options.alt_screen,
            armed: setup.is_ok(),
        };

        let outcome = match setup {
            Ok(()) => self.drive().await,
            Err(e) => Err(e),
        };

        // Reached only if `drive` returned instead of panicking; disarm the
        // guard and do the real, awaited teardown.
        guard.armed = false;
        self.teardown().await;
        self.running.store(false, Ordering::Release);
        outcome
    }

    async fn setup(&mut self) -> Result<()> {
        let mut term = self.terminal.lock().await;
        term.enter_raw_mode()?;
        if self.options.alt_screen {
            term.enter_alt_screen()?;
        }
        term.hide_cursor()?;
        Ok(())
    }

    async fn teardown(&mut self) {
        let mut term = self.terminal.lock().await;
        let _ = term.show_cursor();
        if self.options.alt_screen {
            let _ = term.exit_alt_screen();
        }
        let _ = term.exit_raw_mode();
    }

    async fn drive(&mut self) -> Result<M> {
        let (mut model, init_cmd) = M::init();
        spawn_cmd(&self.tx, init_cmd);
        self.spawn_input_reader();
        self.spawn_resize_watcher();

        let (width, height) = self.terminal.lock().await.size()?;
        let mut prev_buffer = Buffer::new(width, height);
        let renderer = Renderer::new(self.options.synchronized_output);
        let preprocessor = Preprocessor::default();

        self.render(&model, &preprocessor, &renderer, &mut prev_buffer)
            .await?;

        loop {
            let Some(msg) = self.rx.recv().await else {
                break;
            };

            let mut pending = std::collections::VecDeque::from([msg]);
            let mut quit = false;

            while let Some(msg) = pending.pop_front() {
                match msg {
                    Msg::Batch(msgs) | Msg::Sequence(msgs) => {
                        pending.extend(msgs);
                        continue;
                    }
                    Msg::Quit => {
                        quit = true;
                    }
                    Msg::Resize(w, h) => {
                        prev_buffer.resize(w, h);
                        let (next_model, cmd) = model.update(Msg::Resize(w, h));
                        model = next_model;
                        spawn_cmd(&self.tx, cmd);
                    }
                    other => {
                        let (next_model, cmd) = model.update(other);
                        model = next_model;
                        if let Cmd::ExecProcess { program, args, map } = cmd {
                            let outcome = self.run_exec_process(&program, &args).await;
                            let (next_model, cmd) = model.update(Msg::User(map(outcome)));
                            model = next_model;
                            spawn_cmd(&self.tx, cmd);
                        } else {
                            spawn_cmd(&self.tx, cmd);
                        }
                    }
                }
            }

            self.render(&model, &preprocessor, &renderer, &mut prev_buffer)
                .await?;

            if quit {
                break;
            }
        }

        Ok(model)
    }

    /// Render one frame. A panicking `view()` skips this frame rather than
    /// taking down the loop: the panic is caught, the frame is dropped, and
    /// the loop continues on the next message. Three panics in a row give
    /// up with [`Error::ViewPanicked`] instead of retrying forever.
    async fn render(
        &mut self,
        model: &M,
        preprocessor: &Preprocessor,
        renderer: &Renderer,
        prev_buffer: &mut Buffer,
    ) -> Result<()> {
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| model.view()));
        let raw_view = match rendered {
            Ok(view) => {
                self.view_panics = 0;
                view
            }
            Err(_) => {
                self.view_panics += 1;
                tracing::warn!(count = self.view_panics, "view() panicked; skipping frame");
                if self.view_panics >= 3 {
                    return Err(Error::ViewPanicked);
                }
                return Ok(());
            }
        };

        let view = preprocessor.process(&raw_view);
        let mut next = Buffer::new(prev_buffer.width(), prev_buffer.height());
        for (y, line) in view.split('\n').enumerate() {
            if y as u16 >= next.height() {
                break;
            }
            next.write_string(0, y as u16, line, Style::default());
        }

        let cursor = model
            .cursor_position()
            .unwrap_or((0, next.height().saturating_sub(1)));
        let out = renderer.render_frame(prev_buffer, &next, cursor);
        if !out.is_empty() {
            let mut term = self.terminal.lock().await;
            term.write(out.as_bytes())?;
            term.flush()?;
        }
        *prev_buffer = next;
        Ok(())
    }

    async fn run_exec_process(&self, program: &str, args: &[String]) -> Result<i32> {
        // Stop the background input reader from competing with the child
        // process for bytes on the shared terminal file descriptor before
        // handing the terminal over.
        self.reading_paused.store(true, Ordering::Release);

        let suspend = async {
            let mut term = self.terminal.lock().await;
            term.show_cursor()?;
            if self.options.alt_screen {
                term.exit_alt_screen()?;
            }
            term.exit_raw_mode()
        }
        .await;

        let result = match suspend {
            Ok(()) => tokio::process::Command::new(program)
                .args(args)
                .status()
                .await
                .map_err(|e| Error::Process(e.to_string()))
                .map(|status| status.code().unwrap_or(-1)),
            Err(e) => Err(e),
        };

        {
            let mut term = self.terminal.lock().await;
            let _ = term.enter_raw_mode();
            if self.options.alt_screen {
                let _ = term.enter_alt_screen();
            }
            let _ = term.hide_cursor();
        }

        self.reading_paused.store(false, Ordering::Release);
        result
    }

    /// Watch for `SIGWINCH` and inject a `Resize` message with the
    /// terminal's freshly queried size. Terminal resize is reported by the
    /// OS as a signal, not a byte sequence, so it doesn't go through the
    /// input decoder at all.
    #[cfg(unix)]
    fn spawn_resize_watcher(&self) {
        let terminal = Arc::clone(&self.terminal);
        let tx = self.tx.clone();

        let mut signal = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::window_change())
        {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGWINCH handler");
                return;
            }
        };

        tokio::spawn(async move {
            loop {
                if signal.recv().await.is_none() || tx.is_closed() {
                    return;
                }
                let size = terminal.lock().await.size();
                if let Ok((w, h)) = size {
                    let _ = tx.send(Msg::Resize(w, h));
                }
            }
        });
    }

    #[cfg(not(unix))]
    fn spawn_resize_watcher(&self) {}

    fn spawn_input_reader(&self) {
        let terminal = Arc::clone(&self.terminal);
        let tx = self.tx.clone();
        let escape_timeout = self.options.escape_timeout;
        let all_mouse_motion = self.options.all_mouse_motion;
        let reading_paused = Arc::clone(&self.reading_paused);

        tokio::task::spawn_blocking(move || {
            let mut decoder = Decoder::with_escape_timeout(escape_timeout);
            let mut enricher = MouseEnricher::new();
            let mut buf = [0u8; 512];

            loop {
                if tx.is_closed() {
                    return;
                }

                if reading_paused.load(Ordering::Acquire) {
                    std::thread::sleep(Duration::from_millis(15));
                    continue;
                }

                let read = {
                    let mut term = terminal.blocking_lock();
                    term.read_bytes(&mut buf)
                };

                match read {
                    Ok(0) => std::thread::sleep(Duration::from_millis(15)),
                    Ok(n) => {
                        for event in decoder.feed(&buf[..n], Instant::now()) {
                            if dispatch(&tx, &mut enricher, event, all_mouse_motion).is_err() {
                                return;
                            }
                        }
                    }
                    Err(_) => std::thread::sleep(Duration::from_millis(15)),
                }

                if let Some(event) = decoder.poll_timeout(Instant::now()) {
                    let _ = dispatch(&tx, &mut enricher, event, all_mouse_motion);
                }
            }
        });
    }
}

fn dispatch<M>(
    tx: &mpsc::UnboundedSender<Msg<M>>,
    enricher: &mut MouseEnricher,
    event: Event,
    all_mouse_motion: bool,
) -> std::result::Result<(), ()> {
    match event {
        Event::Mouse(raw) => {
            for enriched in enricher.process(raw, Instant::now()) {
                if !all_mouse_motion
                    && enriched.action == crate::event::MouseAction::Motion
                    && enriched.button == crate::event::MouseButton::None
                {
                    continue;
                }
                tx.send(Msg::Mouse(enriched)).map_err(|_| ())?;
            }
            Ok(())
        }
        Event::FocusLost => {
            enricher.reset();
            tx.send(Msg::FocusLost).map_err(|_| ())
        }
        other => tx.send(Msg::from_event(other)).map_err(|_| ()),
    }
}

/// Spawn a command, delivering whatever message it eventually produces (if
/// any) to `tx`. `Batch`/`Sequence` resolve every inner command first and
/// deliver the whole group as a single `Msg::Batch`/`Msg::Sequence`, rather
/// than letting each inner command send its own message independently.
fn spawn_cmd<M>(tx: &mpsc::UnboundedSender<Msg<M>>, cmd: Cmd<M>)
where
    M: Send + fmt::Debug + 'static,
{
    if cmd.is_none() {
        return;
    }
    if matches!(cmd, Cmd::ExecProcess { .. }) {
        tracing::warn!("ExecProcess must be routed through Program::drive, not spawn_cmd");
        return;
    }

    let tx = tx.clone();
    tokio::spawn(async move {
        if let Some(msg) = resolve_cmd(cmd).await {
            let _ = tx.send(msg);
        }
    });
}

/// Resolve a command to the message it produces, recursing into
/// `Batch`/`Sequence` members. Boxed because an `async fn` can't recurse
/// into itself by value without unbounded state-machine size.
fn resolve_cmd<M>(cmd: Cmd<M>) -> Pin<Box<dyn Future<Output = Option<Msg<M>>> + Send>>
where
    M: Send + fmt::Debug + 'static,
{
    Box::pin(async move {
        match cmd {
            Cmd::None => None,
            Cmd::Quit => Some(Msg::Quit),
            Cmd::Tick(duration) => {
                tokio::time::sleep(duration).await;
                Some(Msg::Tick { at: Instant::now() })
            }
            Cmd::Perform(f) => match tokio::task::spawn_blocking(f).await {
                Ok(value) => Some(Msg::User(value)),
                Err(e) => {
                    tracing::warn!(error = %e, "Cmd::Perform task panicked");
                    None
                }
            },
            Cmd::ExecProcess { .. } => {
                tracing::warn!("ExecProcess must be routed through Program::drive, not spawn_cmd");
                None
            }
            // Completion order: every inner command runs concurrently and
            // the results are collected in whichever order they finish.
            Cmd::Batch(cmds) => {
                let cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
                if cmds.is_empty() {
                    return None;
                }
                let handles: Vec<_> = cmds.into_iter().map(resolve_cmd).map(tokio::spawn).collect();
                let mut results = Vec::new();
                for handle in handles {
                    if let Ok(Some(msg)) = handle.await {
                        results.push(msg);
                    }
                }
                if results.is_empty() {
                    None
                } else {
                    Some(Msg::Batch(results))
                }
            }
            // Command order: each inner command is awaited to completion
            // before the next one starts.
            Cmd::Sequence(cmds) => {
                let cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
                if cmds.is_empty() {
                    return None;
                }
                let mut results = Vec::new();
                for cmd in cmds {
                    if let Some(msg) = resolve_cmd(cmd).await {
                        results.push(msg);
                    }
                }
                if results.is_empty() {
                    None
                } else {
                    Some(Msg::Sequence(results))
                }
            }
        }
    })
}

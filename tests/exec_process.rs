//! End-to-end: `Cmd::ExecProcess` suspends and resumes the terminal around a
//! real child process and its exit status reaches the model as a message.

use vellum_tui::error::Result;
use vellum_tui::event::{KeyCode, KeyEvent};
use vellum_tui::terminal::TestBackend;
use vellum_tui::{Cmd, Model, Msg, Program, ProgramOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditorMsg {
    Launch,
    Exited(i32),
}

struct Editor {
    launched: bool,
    exit_code: Option<i32>,
}

impl Model for Editor {
    type Msg = EditorMsg;

    fn init() -> (Self, Cmd<Self::Msg>) {
        (
            Self {
                launched: false,
                exit_code: None,
            },
            Cmd::none(),
        )
    }

    fn update(mut self, msg: Msg<Self::Msg>) -> (Self, Cmd<Self::Msg>) {
        match msg {
            Msg::User(EditorMsg::Launch) => {
                self.launched = true;
                return (
                    self,
                    Cmd::exec_process("true", vec![], |outcome: Result<i32>| {
                        EditorMsg::Exited(outcome.unwrap_or(-1))
                    }),
                );
            }
            Msg::User(EditorMsg::Exited(code)) => {
                self.exit_code = Some(code);
                return (self, Cmd::quit());
            }
            Msg::Key(KeyEvent {
                code: KeyCode::Escape,
                ..
            }) => return (self, Cmd::quit()),
            _ => {}
        }
        (self, Cmd::none())
    }

    fn view(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exited: {code}"),
            None => "running".to_string(),
        }
    }
}

#[tokio::test]
async fn child_process_exit_status_is_delivered_as_a_user_message() {
    let terminal = TestBackend::new(20, 1);
    let program: Program<Editor, _> = Program::new(terminal, ProgramOptions::new().inline());
    let handle = program.handle();

    handle.send(Msg::User(EditorMsg::Launch)).unwrap();

    let model = program.run().await.unwrap();
    assert!(model.launched);
    assert_eq!(model.exit_code, Some(0));
}

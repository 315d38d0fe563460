use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use iced::{
    alignment, color, executor,
    theme::Palette,
    widget::{button, column, horizontal_rule, row, text, text_input},
    Application, Command, Theme,
};

mod config;
use config::Config;
mod data;
use data::RegistrationForm;
mod error;
use error::Error;
mod session;
use session::{CaptureReport, RecognitionReport};
mod utils;
mod vision;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .compact()
        .init();

    let settings: iced::Settings<()> = iced::Settings {
        window: iced::window::Settings {
            size: (600, 400),
            resizable: false,
            decorations: true,
            ..Default::default()
        },
        ..Default::default()
    };
    Facemark::run(settings)
}

struct Facemark {
    // the configuration for the whole application
    config: Config,
    // which camera session, if any, is currently active
    mode: Mode,
    // the registration fields exactly as typed
    form: RegistrationForm,
    // set to stop the active camera session at its next frame
    cancel: Option<Arc<AtomicBool>>,
    // outcome of the last finished operation
    status: Option<Status>,
}

impl Default for Facemark {
    fn default() -> Self {
        Self {
            config: Config::new(),
            mode: Mode::Idle,
            form: RegistrationForm::default(),
            cancel: None,
            status: None,
        }
    }
}

impl iced::Application for Facemark {
    type Executor = executor::Default;
    type Flags = ();
    type Message = Message;
    type Theme = Theme;

    fn new(_flags: Self::Flags) -> (Self, Command<Self::Message>) {
        (Self::default(), Command::none())
    }

    fn title(&self) -> String {
        "Facemark 1.0.0".to_string()
    }

    fn theme(&self) -> Self::Theme {
        let facemark_palette: Palette = Palette {
            background: color!(246, 245, 240),
            text: color!(47, 54, 64),
            primary: color!(74, 105, 189),
            success: color!(96, 163, 119),
            danger: color!(192, 87, 70),
        };
        iced::Theme::custom(facemark_palette)
    }

    fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
        match message {
            Message::SerialInput(value) => {
                self.form.serial = value;
                Command::none()
            }
            Message::IdInput(value) => {
                self.form.id = value;
                Command::none()
            }
            Message::NameInput(value) => {
                self.form.name = value;
                Command::none()
            }
            Message::Register => match self.form.validate() {
                Ok(registration) => {
                    self.mode = Mode::Capturing;
                    self.status = None;
                    let cancel = Arc::new(AtomicBool::new(false));
                    self.cancel = Some(cancel.clone());
                    let config = self.config.clone();
                    Command::perform(
                        async move { session::capture(config, registration, cancel).await },
                        Message::Registered,
                    )
                }
                Err(error) => {
                    tracing::warn!("{}", error);
                    self.status = Some(Status::from_error(&error));
                    Command::none()
                }
            },
            Message::Registered(result) => {
                self.mode = Mode::Idle;
                self.cancel = None;
                match result {
                    Ok(report) => {
                        self.status = Some(Status::success(format!(
                            "registered {} (id {}), model trained over {} sample(s)",
                            report.student.name, report.student.id, report.samples_trained
                        )));
                        self.form = RegistrationForm::default();
                    }
                    Err(error) => {
                        tracing::warn!("{}", error);
                        self.status = Some(Status::from_error(&error));
                    }
                }
                Command::none()
            }
            Message::MarkAttendance => {
                self.mode = Mode::Recognizing;
                self.status = None;
                let cancel = Arc::new(AtomicBool::new(false));
                self.cancel = Some(cancel.clone());
                let config = self.config.clone();
                Command::perform(
                    async move { session::recognize(config, cancel).await },
                    Message::Marked,
                )
            }
            Message::Marked(result) => {
                self.mode = Mode::Idle;
                self.cancel = None;
                match result {
                    Ok(report) => {
                        self.status = Some(Status::success(format!(
                            "attendance marked for {} at {}",
                            report.record.name, report.record.timestamp
                        )));
                    }
                    Err(error) => {
                        tracing::warn!("{}", error);
                        self.status = Some(Status::from_error(&error));
                    }
                }
                Command::none()
            }
            Message::Cancel => {
                if let Some(cancel) = &self.cancel {
                    cancel.store(true, Ordering::Relaxed);
                }
                Command::none()
            }
        }
    }

    fn view(&self) -> iced::Element<'_, Self::Message, iced::Renderer<Self::Theme>> {
        match self.mode {
            Mode::Idle => column![
                text("Face Recognition Attendance")
                    .size(24)
                    .horizontal_alignment(alignment::Horizontal::Center),
                text_input("serial", self.form.serial.as_str())
                    .on_input(Message::SerialInput)
                    .padding([10, 5]),
                text_input("id", self.form.id.as_str())
                    .on_input(Message::IdInput)
                    .padding([10, 5]),
                text_input("name", self.form.name.as_str())
                    .on_input(Message::NameInput)
                    .on_submit(Message::Register)
                    .padding([10, 5]),
                row![
                    button(text("register").horizontal_alignment(alignment::Horizontal::Center))
                        .on_press(Message::Register)
                        .padding(5)
                        .width(150),
                    button(
                        text("mark attendance")
                            .horizontal_alignment(alignment::Horizontal::Center)
                    )
                    .on_press(Message::MarkAttendance)
                    .padding(5)
                    .width(150),
                ]
                .spacing(20),
                horizontal_rule(1),
                self.status_line(),
            ]
            .align_items(alignment::Alignment::Center)
            .padding(20)
            .spacing(10)
            .into(),
            Mode::Capturing => column![
                text("looking for a face")
                    .horizontal_alignment(alignment::Horizontal::Center)
                    .vertical_alignment(alignment::Vertical::Center),
                text("...")
                    .horizontal_alignment(alignment::Horizontal::Center)
                    .vertical_alignment(alignment::Vertical::Center),
                button(text("cancel"))
                    .on_press(Message::Cancel)
                    .padding(10)
                    .style(iced::theme::Button::Destructive),
            ]
            .align_items(alignment::Alignment::Center)
            .padding(20)
            .spacing(10)
            .into(),
            Mode::Recognizing => column![
                text("recognizing")
                    .horizontal_alignment(alignment::Horizontal::Center)
                    .vertical_alignment(alignment::Vertical::Center),
                text("...")
                    .horizontal_alignment(alignment::Horizontal::Center)
                    .vertical_alignment(alignment::Vertical::Center),
                button(text("cancel"))
                    .on_press(Message::Cancel)
                    .padding(10)
                    .style(iced::theme::Button::Destructive),
            ]
            .align_items(alignment::Alignment::Center)
            .padding(20)
            .spacing(10)
            .into(),
        }
    }
}

impl Facemark {
    fn status_line(&self) -> iced::Element<'_, Message, iced::Renderer<Theme>> {
        match &self.status {
            Some(status) => {
                let colour = match status.severity {
                    Severity::Success => color!(96, 163, 119),
                    Severity::Warning => color!(191, 144, 61),
                    Severity::Failure => color!(192, 87, 70),
                };
                text(status.message.as_str())
                    .style(iced::theme::Text::Color(colour))
                    .horizontal_alignment(alignment::Horizontal::Center)
                    .into()
            }
            None => text("").into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    SerialInput(String),
    IdInput(String),
    NameInput(String),
    Register,
    Registered(error::Result<CaptureReport>),
    MarkAttendance,
    Marked(error::Result<RecognitionReport>),
    Cancel,
}

enum Mode {
    Idle,
    Capturing,
    Recognizing,
}

struct Status {
    message: String,
    severity: Severity,
}

enum Severity {
    Success,
    Warning,
    Failure,
}

impl Status {
    fn success(message: String) -> Self {
        Self {
            message,
            severity: Severity::Success,
        }
    }

    fn from_error(error: &Error) -> Self {
        Self {
            message: error.to_string(),
            severity: if error.is_warning() {
                Severity::Warning
            } else {
                Severity::Failure
            },
        }
    }
}

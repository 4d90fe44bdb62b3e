//! The fixed form step sequence and the prompt/keyboard builder.
//!
//! `render_step_prompt` is a pure function of the step and the accumulated
//! description; keyboards are one-column reply grids the way the original
//! deployment rendered them.

use serde::{Deserialize, Serialize};

pub const START_COMMAND: &str = "/start";
pub const BACK_LABEL: &str = "Назад";
pub const CONFIRM_LABEL: &str = "Створити задачу";
pub const STATUS_LABEL: &str = "Перевірити статус задачі";
pub const MY_TICKETS_LABEL: &str = "Мої заявки";
pub const EXIT_COMMENTS_LABEL: &str = "Завершити коментування";

pub const DIVISION_OPTIONS: &[&str] = &[
    "Офіс",
    "Дніпро",
    "PSC",
    "Київ",
    "Біла Церква",
    "Суми",
    "Вінниця",
    "Запоріжжя",
    "Краматорськ",
    "Кривий Ріг",
    "Кропивницький",
    "Львів",
    "Одеса",
    "Полтава",
    "Харків",
    "Черкаси",
    "Чернігів",
    "Імпорт",
];

pub const DEPARTMENT_OPTIONS: &[&str] = &[
    "Комерційний департамент",
    "Операційний департамент",
    "Департамент маркетинга",
    "ІТ департамент",
    "Юр. департамент",
    "Департамент безпеки",
    "Департамент персоналу",
    "Фінансовий департамент",
    "Бухгалтерія",
    "Контрольно ревізійний відділ",
    "Відділ кадрів",
];

pub const SERVICE_OPTIONS: &[&str] = &[
    "E-mix 2.x",
    "E-mix 3.x",
    "E-supervisor",
    "E-mix market-android",
    "E-mix market iOS",
    "E-drive",
    "E-inventory",
    "Пошта",
    "Мобільний зв'язок",
    "Ремонт техніки",
    "Портал техпідтримки",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates the ordered form steps; `Confirm` is always last.
pub enum FormStep {
    Division,
    Department,
    Service,
    FullName,
    Description,
    Confirm,
}

impl FormStep {
    pub const SEQUENCE: [FormStep; 6] = [
        FormStep::Division,
        FormStep::Department,
        FormStep::Service,
        FormStep::FullName,
        FormStep::Description,
        FormStep::Confirm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Division => "division",
            Self::Department => "department",
            Self::Service => "service",
            Self::FullName => "full_name",
            Self::Description => "description",
            Self::Confirm => "confirm",
        }
    }

    pub fn index(self) -> usize {
        Self::SEQUENCE
            .iter()
            .position(|step| *step == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Option<FormStep> {
        Self::SEQUENCE.get(self.index() + 1).copied()
    }

    /// The previous step, saturating at the first one.
    pub fn previous(self) -> FormStep {
        let index = self.index();
        Self::SEQUENCE[index.saturating_sub(1)]
    }

    /// Enumerated options offered for this step; empty for free-text steps
    /// and the confirmation step.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Self::Division => DIVISION_OPTIONS,
            Self::Department => DEPARTMENT_OPTIONS,
            Self::Service => SERVICE_OPTIONS,
            Self::FullName | Self::Description | Self::Confirm => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Prompt text plus the reply keyboard rows for one step.
pub struct StepPrompt {
    pub text: String,
    pub keyboard: Vec<Vec<String>>,
}

pub fn render_step_prompt(step: FormStep, description: &str) -> StepPrompt {
    let text = match step {
        FormStep::Division => "Оберіть ваш Підрозділ:".to_string(),
        FormStep::Department => "Оберіть Департамент:".to_string(),
        FormStep::Service => "Оберіть Сервіс:".to_string(),
        FormStep::FullName => "Введіть ваше Прізвище та Ім'я:".to_string(),
        FormStep::Description => "Опишіть вашу проблему:".to_string(),
        FormStep::Confirm => format!(
            "Натисніть '{CONFIRM_LABEL}', якщо все заповнено.\n\nОпис задачі:\n{description}"
        ),
    };

    let mut keyboard: Vec<Vec<String>> = step
        .options()
        .iter()
        .map(|option| vec![option.to_string()])
        .collect();
    if step == FormStep::Confirm {
        keyboard.push(vec![CONFIRM_LABEL.to_string()]);
    }
    keyboard.push(vec![BACK_LABEL.to_string()]);

    StepPrompt { text, keyboard }
}

/// Persistent menu offered once a ticket exists.
pub fn main_menu_keyboard() -> Vec<Vec<String>> {
    vec![
        vec![STATUS_LABEL.to_string()],
        vec![MY_TICKETS_LABEL.to_string()],
        vec![EXIT_COMMENTS_LABEL.to_string()],
    ]
}

/// Single-button keyboard shown while comment mode is active.
pub fn comment_mode_keyboard() -> Vec<Vec<String>> {
    vec![vec![EXIT_COMMENTS_LABEL.to_string()]]
}

//! User-facing message copy, kept in one place so the router and runtime
//! speak with one voice.

pub const NO_SESSION_TEXT: &str = "Будь ласка, почніть з /start";
pub const MENU_PROMPT_TEXT: &str =
    "Ви можете перевірити статус заявки, надіслати файли або написати коментар.";
pub const NO_ACTIVE_TICKET_TEXT: &str = "Немає активної задачі.";
pub const MEDIA_GUIDANCE_TEXT: &str =
    "❗ Спочатку натисніть 'Створити задачу', а потім надсилайте файли.";
pub const OVERSIZE_FILE_TEXT: &str = "⛔ Файл завеликий: приймаються файли до 9.9 МБ.";
pub const COMMENT_ADDED_TEXT: &str = "✅ Коментар додано";
pub const COMMENTS_CLOSED_TEXT: &str = "Режим коментарів завершено.";
pub const TICKET_LIST_PROMPT_TEXT: &str = "Оберіть заявку для коментування:";
pub const NO_TICKETS_TEXT: &str = "У вас ще немає заявок.";
pub const CONTACT_UNKNOWN_TEXT: &str = "Ваш номер не знайдено в довіднику.";
pub const DONE_CLEARED_TEXT: &str = "✅ Заявку виконано. Щоб створити нову, натисніть /start";
pub const GENERIC_FAILURE_TEXT: &str = "⚠️ Сталася помилка. Спробуйте ще раз.";

pub fn ticket_created_text(ticket_id: &str) -> String {
    format!("✅ Задача створена: {ticket_id}")
}

pub fn create_failed_text(detail: &str) -> String {
    format!("❌ Помилка створення задачі: {detail}")
}

pub fn comment_failed_text(detail: &str) -> String {
    format!("⛔ Помилка додавання коментаря: {detail}")
}

pub fn attach_ok_text(file_name: &str) -> String {
    format!("✅ '{file_name}' прикріплено")
}

pub fn attach_failed_text(detail: &str) -> String {
    format!("⛔ Помилка при надсиланні файлу: {detail}")
}

pub fn status_text(ticket_id: &str, label: &str) -> String {
    format!("Статус {ticket_id}: {label}")
}

pub fn status_failed_text(detail: &str) -> String {
    format!("⚠️ Помилка при отриманні статусу: {detail}")
}

pub fn comment_mode_text(ticket_id: &str) -> String {
    format!("Пишіть коментарі до заявки {ticket_id}.")
}

pub fn contact_saved_text(full_name: &str) -> String {
    format!("✅ Дякуємо! Ваші дані знайдено: {full_name}")
}

pub fn tracker_comment_notification_text(ticket_id: &str, body: &str) -> String {
    format!("🆕 Новий коментар у {ticket_id}:\n{body}")
}

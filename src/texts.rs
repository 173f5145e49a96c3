//! User-facing texts and reply keyboard labels.

pub const JOKE_BUTTON: &str = "🤡 - Анекдот";
pub const START_NONSTOP_BUTTON: &str = "🗣️ - Включить нонстоп";
pub const STOP_NONSTOP_BUTTON: &str = "✋ - Выключить нонстоп";
pub const DOCUMENTATION_BUTTON: &str = "📃 - Открыть документацию";

/// Reply keyboard attached to the greeting, one button per row.
pub const MENU_BUTTONS: [&str; 4] = [
    JOKE_BUTTON,
    START_NONSTOP_BUTTON,
    STOP_NONSTOP_BUTTON,
    DOCUMENTATION_BUTTON,
];

pub const DOCUMENTATION: &str = "Андекдоты4и - это бесплатный бот анекдотов.\n\
Анекдоты берутся с сайта http://rzhunemogu.ru/. Спасибо за апи :3\n\
Если что-то в боте сломалось - смело пишите автору.\n\
Список команд:\n\
/start - Запустить бота\n\
/anekdot (кнопка \"🤡 - Анекдот\") - Получить рандомный анекдот\n\
/nonstop (кнопка \"🗣️ - Включить нонстоп\") - Включить автоматическую \
отправку анекдотов. Можно настраивать периодичность (/period).\n\
/stop (кнопка \"✋ - Выключить нонстоп\") - \
Отключить автоматическую отправку сообщений\n\
/docs (кнопка \"📃 - Открыть документацию\") - \
Документация к боту (этот текст)\n\
/period - Установить период отправки сообщений. \
Чтобы изменить этот параметр, небходимо вызвать команду и \
ввести период отправки сообщений В МИНУТАХ!!!\n\
/exit - Выйти из настройки периода и вернуть значение по умолчанию";

pub const NONSTOP_TEXT: &str =
    "Автоматическая отправка анекдотов включена. Нажмите /stop для остановки";
pub const STOP_TEXT: &str =
    "Автоматическая отправка анекдотов остановлена. Нажмите /nonstop чтобы запустить его снова";
pub const SUCCESS: &str = "Успешно";

pub fn greeting(name: &str) -> String {
    format!("Привет, {name}. Бот запущен, нажми /docs чтобы ознакомиться с документацией и командами")
}

pub fn ask_for_period(current_minutes: f64) -> String {
    format!(
        "Установите период отправки сообщения в минутах. На данный момент: {current_minutes} минут.\n\
         Нажмите /exit для выхода."
    )
}

pub fn period_set(minutes: f64) -> String {
    format!("Установлен период: {minutes} минут.")
}

pub fn period_error(error: &impl std::fmt::Display) -> String {
    format!("Ошибка {error}. Установите период отправки сообщений в минутах")
}

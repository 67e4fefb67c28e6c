//! Main window view.
//!
//! Three numbered sections (clips, music, export) above the log panel and
//! status bar. Every control is disabled while an export runs.

use iced::alignment::Vertical;
use iced::widget::{button, column, container, row, scrollable, text, Space};
use iced::{Background, Border, Element, Length, Theme};

use crate::app::{App, Message};
use crate::theme::{colors, font, spacing, CLIP_LIST_HEIGHT, SIDE_BUTTON_WIDTH};
use crate::widgets::clip_list;

/// Build the main window view.
pub fn view(app: &App) -> Element<'_, Message> {
    let content = column![
        clips_section(app),
        music_section(app),
        export_section(app),
        log_section(app),
        status_bar(app),
    ]
    .spacing(spacing::SM)
    .padding(spacing::MD);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Enabled only while idle.
fn action(label: &str, message: Message, idle: bool) -> button::Button<'_, Message> {
    button(text(label).size(font::NORMAL))
        .on_press_maybe(idle.then_some(message))
        .padding([spacing::XS, spacing::MD])
}

fn section_title(title: &str) -> Element<'_, Message> {
    text(title).size(font::LG).into()
}

fn framed<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(spacing::SM)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let palette = theme.extended_palette();
            container::Style {
                background: Some(Background::Color(palette.background.weak.color)),
                border: Border {
                    color: palette.background.strong.color,
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

fn clips_section(app: &App) -> Element<'_, Message> {
    let idle = app.is_idle();
    let has_selection = app.selected.is_some();

    let list = container(clip_list::view(
        app.playlist.display_names(),
        app.selected,
        idle,
    ))
    .width(Length::Fill)
    .height(Length::Fixed(CLIP_LIST_HEIGHT));

    let buttons = column![
        action("Add Clip(s)", Message::AddClips, idle).width(Length::Fill),
        action("Remove Selected", Message::RemoveSelected, idle).width(Length::Fill),
        action("Move Up", Message::MoveUp, idle && has_selection).width(Length::Fill),
        action("Move Down", Message::MoveDown, idle && has_selection).width(Length::Fill),
    ]
    .spacing(spacing::XS)
    .width(Length::Fixed(SIDE_BUTTON_WIDTH));

    column![
        section_title("1. Add Video Clips (in order)"),
        framed(row![list, buttons].spacing(spacing::SM)),
    ]
    .spacing(spacing::XS)
    .into()
}

fn music_section(app: &App) -> Element<'_, Message> {
    let idle = app.is_idle();

    let label = match app.playlist.audio_display_name() {
        Some(name) => text(name).size(font::NORMAL),
        None => text("No music selected.")
            .size(font::NORMAL)
            .color(colors::TEXT_MUTED),
    };
    let has_music = app.playlist.audio().is_some();

    column![
        section_title("2. Add Music (Optional)"),
        framed(
            row![
                label,
                Space::new().width(Length::Fill),
                action("Add Music", Message::AddMusic, idle),
                action("Remove", Message::RemoveMusic, idle && has_music),
            ]
            .spacing(spacing::SM)
            .align_y(Vertical::Center)
        ),
    ]
    .spacing(spacing::XS)
    .into()
}

fn export_section(app: &App) -> Element<'_, Message> {
    let export_button = button(
        container(text("Combine and Export Video").size(font::LG))
            .center_x(Length::Fill),
    )
    .on_press_maybe(app.is_idle().then_some(Message::Export))
    .padding([spacing::SM, spacing::LG])
    .width(Length::Fill);

    column![section_title("3. Export Video"), export_button]
        .spacing(spacing::XS)
        .into()
}

fn log_section(app: &App) -> Element<'_, Message> {
    let log = scrollable(
        container(text(&app.log_text).size(font::SM))
            .padding(spacing::SM)
            .width(Length::Fill),
    )
    .anchor_bottom()
    .height(Length::Fill);

    container(framed(log))
        .height(Length::Fill)
        .into()
}

fn status_bar(app: &App) -> Element<'_, Message> {
    let status = text(&app.status_text).size(font::SM);
    let status = if app.is_idle() {
        status
    } else {
        status.color(colors::BUSY)
    };

    row![status, Space::new().width(Length::Fill)]
        .padding([spacing::XS, 0.0])
        .align_y(Vertical::Center)
        .into()
}

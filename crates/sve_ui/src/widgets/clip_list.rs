//! Selectable clip list.
//!
//! One row per clip, rendered straight from the playlist's display names.
//! Clicking a row selects it.

use iced::widget::{column, container, mouse_area, scrollable, text};
use iced::{Background, Border, Element, Length, Theme};

use crate::app::Message;
use crate::theme::{colors, font, spacing};

/// Build the clip list.
pub fn view<'a>(
    names: Vec<String>,
    selected: Option<usize>,
    enabled: bool,
) -> Element<'a, Message> {
    if names.is_empty() {
        return container(
            text("No clips yet. Use Add Clip(s) or drop files here.")
                .size(font::SM)
                .color(colors::TEXT_MUTED),
        )
        .padding(spacing::MD)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .into();
    }

    let rows: Vec<Element<'a, Message>> = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| clip_row(idx, name, selected == Some(idx), enabled))
        .collect();

    scrollable(column(rows).spacing(1).width(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn clip_row<'a>(
    idx: usize,
    name: String,
    is_selected: bool,
    enabled: bool,
) -> Element<'a, Message> {
    let label = text(format!("{}. {}", idx + 1, name)).size(font::NORMAL);

    let row = container(label)
        .padding([spacing::XS, spacing::SM])
        .width(Length::Fill)
        .style(move |theme: &Theme| {
            let palette = theme.extended_palette();
            if is_selected {
                container::Style {
                    background: Some(Background::Color(palette.primary.weak.color)),
                    text_color: Some(palette.primary.weak.text),
                    border: Border {
                        radius: 2.0.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                }
            } else {
                container::Style::default()
            }
        });

    if enabled {
        mouse_area(row).on_press(Message::SelectClip(idx)).into()
    } else {
        row.into()
    }
}

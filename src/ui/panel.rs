use iced::widget::{button, column, row, slider, text, Column};
use iced::{Color, Element};

use crate::state::editor::{Action, FilterControl};
use crate::Message;

const DISABLED_LABEL: Color = Color::from_rgb(0.5, 0.5, 0.5);

/// One labeled slider per filter, in definition order
///
/// Disabled sliders still render so the panel layout does not jump when an
/// image loads; the editor ignores their changes.
pub fn settings(controls: &[FilterControl]) -> Element<'_, Message> {
    let rows: Vec<Element<'_, Message>> = controls.iter().map(|control| {
        let def = control.id.definition();
        let id = control.id;

        let mut label = text(format!("{}: {}", def.label, control.display)).size(14);
        if !control.enabled {
            label = label.color(DISABLED_LABEL);
        }

        column![
            label,
            slider(def.min..=def.max, control.value, move |v| Message::SliderChanged(id, v))
                .step(1.0),
        ]
        .spacing(4)
        .into()
    }).collect();

    Column::with_children(rows).spacing(12).into()
}

/// Export and Reset buttons
pub fn actions<'a>() -> Element<'a, Message> {
    row![
        button("Export")
            .on_press(Message::Action(Action::Export))
            .padding(10),
        button("Reset")
            .on_press(Message::Action(Action::Reset))
            .padding(10),
    ]
    .spacing(10)
    .into()
}

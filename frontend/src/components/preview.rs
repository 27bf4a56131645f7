//! Preview of normalized rows before they are sent.

use std::rc::Rc;

use leptos::*;
use vetimport::{fields_for, render_with_fields, RowRecord, TableType};

#[component]
pub fn PreviewSection(
    table_type: TableType,
    /// Rows held by the session
    #[prop(into)]
    rows: Signal<Rc<Vec<RowRecord>>>,
    /// Row cap for the table
    max_rows: usize,
    #[prop(into)] can_confirm: Signal<bool>,
    #[prop(into)] sending: Signal<bool>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let fields = fields_for(&table_type);
    let table = create_memo(move |_| rows.with(|rows| render_with_fields(rows, fields, max_rows)));

    view! {
        <div class="preview-section show">
            <div class="preview-header">
                <div class="preview-title">"📋 Review " {table_type.label().to_string()}</div>
                <button class="btn btn-secondary" on:click=move |_| on_cancel.call(())>"Cancel"</button>
            </div>

            <div class="preview-content">
                <table class="preview-table">
                    <thead>
                        <tr>
                            <th class="row-index">"#"</th>
                            {move || table.with(|t| {
                                t.columns
                                    .iter()
                                    .map(|column| view! { <th title=column.key.clone()>{column.label.clone()}</th> })
                                    .collect_view()
                            })}
                        </tr>
                    </thead>
                    <tbody>
                        {move || table.with(|t| {
                            t.rows
                                .iter()
                                .map(|row| {
                                    let cells = t
                                        .columns
                                        .iter()
                                        .map(|column| view! { <td>{t.cell(row, column)}</td> })
                                        .collect_view();
                                    view! {
                                        <tr>
                                            <td class="row-index">{row.index + 1}</td>
                                            {cells}
                                        </tr>
                                    }
                                })
                                .collect_view()
                        })}
                    </tbody>
                </table>
            </div>

            <div class="preview-footer">
                <div class="preview-count">{move || table.with(|t| t.summary())}</div>
                <button
                    class="btn btn-primary"
                    on:click=move |_| on_confirm.call(())
                    disabled=move || !can_confirm.get()
                >
                    {move || if sending.get() { "Sending..." } else { "Confirm import" }}
                </button>
            </div>
        </div>
    }
}

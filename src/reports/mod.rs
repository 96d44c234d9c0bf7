use bindforge::binding::KeyBinding;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

pub fn print_binding_table(binding: &KeyBinding) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Ability").add_attribute(Attribute::Bold),
        Cell::new("Key").fg(Color::Cyan),
    ]);

    for (i, (ability, key)) in binding.pairs().enumerate() {
        table.add_row(vec![
            Cell::new(i).set_alignment(CellAlignment::Right),
            Cell::new(ability),
            Cell::new(key).set_alignment(CellAlignment::Center),
        ]);
    }
    println!("{}", table);
}

pub fn print_loss_summary(binding: &KeyBinding) {
    let Some(loss) = binding.loss_breakdown() else {
        return;
    };

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Individual"),
        Cell::new(format!("{:.4}", loss.individual)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Combination"),
        Cell::new(format!("{:.4}", loss.combination)).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.4}", loss.total))
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right),
    ]);
    println!("{}", table);
}

//! Table formatting utilities

use prettytable::{Cell, Row, Table};
use skelmix_pose::{Hierarchy, Pose};

use crate::utils::format::{format_quat, format_vec3};

/// Create a table with headers
pub fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let header_cells: Vec<Cell> = headers
        .into_iter()
        .map(|h| Cell::new(h).style_spec("b"))
        .collect();
    table.set_titles(Row::new(header_cells));

    table
}

/// Add a row to a table
pub fn add_table_row(table: &mut Table, cells: Vec<String>) {
    let row_cells: Vec<Cell> = cells.into_iter().map(|s| Cell::new(&s)).collect();
    table.add_row(Row::new(row_cells));
}

/// One row per bone: index, name, translation, rotation, scale
pub fn pose_table(hierarchy: &Hierarchy, pose: &Pose) -> Table {
    let mut table = create_table(vec!["#", "Bone", "Translation", "Rotation", "Scale"]);

    for (index, (bone, transform)) in hierarchy.bones().iter().zip(pose.iter()).enumerate() {
        add_table_row(
            &mut table,
            vec![
                index.to_string(),
                bone.name.clone(),
                format_vec3(transform.translation),
                format_quat(transform.rotation),
                format_vec3(transform.scale),
            ],
        );
    }

    table
}

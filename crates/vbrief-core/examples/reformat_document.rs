use std::env;

use vbrief_core::{DumpOptions, PlanItem, Status, VBriefDocument};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args().nth(1).ok_or("missing document path")?;

    let mut document = VBriefDocument::from_file(&path, false)?;
    document
        .plan
        .add_item(PlanItem::new("Review formatting", Status::Pending));

    print!("{}", document.to_json(DumpOptions::preserve())?);
    Ok(())
}

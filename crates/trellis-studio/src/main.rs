mod screens;

use anyhow::{Context as _, Result, anyhow};
use trellis::logging::{LoggingConfig, init_logging};
use trellis::{Context, Materializer, ObjectRef};
use trellis_ui::prelude::*;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let m = Materializer::builder()
        .registry(screens::registry())
        .loader(screens::templates())
        .namespace("studio")
        .build();

    for name in screens::ALL {
        let mut ctx = Context::new();
        let screen = m.create_in(&mut ctx, name, &[]).with_context(|| format!("materializing {name}"))?;
        let root = screen.as_component().ok_or_else(|| anyhow!("{name} has no component"))?;

        println!();
        println!("── {name} ──");
        print_tree(&root, None, 1);
        exercise(name, &screen, &ctx)?;
    }
    Ok(())
}

fn print_tree(c: &Component, constraint: Option<&Constraint>, depth: usize) {
    let mut line = format!("{}{}", "  ".repeat(depth), c.class());
    if let Some(title) = c.title() {
        line.push_str(&format!(" \"{title}\""));
    }
    if let Some(text) = c.text() {
        line.push_str(&format!(" [{text}]"));
    }
    match constraint {
        Some(Constraint::Name(n)) => line.push_str(&format!(" @{n}")),
        Some(Constraint::Index(i)) => line.push_str(&format!(" @{i}")),
        Some(Constraint::Object(_)) | None => {}
    }
    let size = c.preferred_size();
    line.push_str(&format!(" {}x{}", size.width, size.height));
    println!("{line}");
    for (child, constraint) in c.children_with_constraints() {
        print_tree(&child, constraint.as_ref(), depth + 1);
    }
}

fn lookup(ctx: &Context, id: &str) -> Result<Component> {
    ctx.lookup(id).and_then(|o| o.as_component()).ok_or_else(|| anyhow!("no component registered as {id}"))
}

/// Poke the built tree the way a user would.
fn exercise(name: &str, screen: &ObjectRef, ctx: &Context) -> Result<()> {
    match name {
        screens::HELLO => lookup(ctx, "wave")?.click(),
        screens::MOUSE => {
            let pad = lookup(ctx, "pad")?;
            pad.fire(&Event::MouseMotion { x: 40, y: 12, dragging: false });
            pad.fire(&Event::Mouse { action: MouseAction::Clicked, x: 40, y: 12 });
        }
        screens::CREW => {
            let list = lookup(ctx, "crew")?;
            for cell in list.rendered_cells() {
                println!("  {cell}");
            }
            list.fire(&Event::ListSelection { first: 1, last: 1 });
        }
        screens::GROUPS => {
            let leo = screens::as_screen(screen)
                .and_then(|s| s.component("leo"))
                .ok_or_else(|| anyhow!("leo was not bound"))?;
            let geo = lookup(ctx, "geo")?;
            geo.click();
            println!("  low orbit: {}, geostationary: {}", leo.is_selected(), geo.is_selected());
        }
        screens::NESTED => {
            lookup(ctx, "fancyButton")?.click();
            lookup(ctx, "submit")?.click();
        }
        _ => {}
    }
    Ok(())
}

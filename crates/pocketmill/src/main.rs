use anyhow::Result;
use kurbo::{Point, Rect};
use pocketmill::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let operation = args.get(1).map(|s| s.as_str()).unwrap_or("pocket");

    match operation {
        "pocket" => demo_pocket()?,
        "pocket-circle" => demo_pocket_circle()?,
        "pocket-rect" => demo_pocket_rect()?,
        "profile" => demo_profile()?,
        _ => {
            println!("Usage: pocketmill [pocket|pocket-circle|pocket-rect|profile]");
            println!("  pocket         - Raster-clear an L-shaped pocket (default)");
            println!("  pocket-circle  - Spiral-clear a circular pocket");
            println!("  pocket-rect    - Spiral-clear a rectangular pocket");
            println!("  profile        - Follow the contour with outside compensation");
        }
    }
    Ok(())
}

fn demo_params(compensation: CutterCompensation) -> Result<PocketParams> {
    ToolLibrary::with_defaults().params_for("6mm endmill", compensation)
}

fn print_path(result: PlanResult<Toolpath>) {
    match result {
        Ok(toolpath) => {
            let gcode = post_process_grbl(&toolpath, &PostConfig::default());
            println!(
                "Generated {} move(s), {:.1}mm of cutting",
                toolpath.moves.len(),
                toolpath.total_length()
            );
            println!("\nG-code:\n");
            print!("{}", gcode);
        }
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn demo_pocket() -> Result<()> {
    println!("pocketmill - Raster Pocket");
    println!("==========================\n");

    // L-shaped pocket, 100x100mm with a 40x50mm notch out of the top right
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 50.0),
        Point::new(60.0, 50.0),
        Point::new(60.0, 100.0),
        Point::new(0.0, 100.0),
        Point::new(0.0, 0.0),
    ];
    let segments = corners
        .windows(2)
        .map(|w| Segment::line(w[0], w[1]))
        .collect();
    let boundary = Boundary::new(segments, false);

    let params = demo_params(CutterCompensation::Inside)?;
    print_path(plan_pocket(&boundary, &params));
    Ok(())
}

fn demo_pocket_circle() -> Result<()> {
    println!("pocketmill - Circular Pocket");
    println!("============================\n");

    let boundary = Boundary::circle(Point::new(50.0, 50.0), 40.0, false);
    let params = demo_params(CutterCompensation::Inside)?;
    print_path(plan_pocket(&boundary, &params));
    Ok(())
}

fn demo_pocket_rect() -> Result<()> {
    println!("pocketmill - Rectangular Pocket");
    println!("===============================\n");

    let boundary = Boundary::rectangle(Rect::new(0.0, 0.0, 100.0, 60.0), false);
    let params = demo_params(CutterCompensation::Inside)?;
    print_path(plan_pocket(&boundary, &params));
    Ok(())
}

fn demo_profile() -> Result<()> {
    println!("pocketmill - Profile Contour");
    println!("============================\n");

    let boundary = Boundary::rectangle(Rect::new(0.0, 0.0, 100.0, 100.0), false);
    let radius = ToolLibrary::with_defaults().radius_of("6mm endmill")?;
    print_path(generate_profile_toolpath(
        &boundary,
        radius,
        CutterCompensation::Outside,
    ));
    Ok(())
}

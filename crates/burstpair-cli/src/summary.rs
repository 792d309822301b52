use burstpair_core::align::FrameOutcome;
use burstpair_core::pipeline::config::PipelineConfig;
use burstpair_core::pipeline::RunReport;
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    warning: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            warning: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Burst Pair Pipeline"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(19)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Extensions"),
        s.value.apply_to(config.loader.extensions.join(", "))
    );
    println!();

    let reg = &config.registration;
    println!("  {}", s.header.apply_to("Registration"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Method"),
        s.method.apply_to("ECC (Euclidean)")
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(reg.scale)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Iterations"),
        s.value.apply_to(reg.max_iterations)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Epsilon"),
        s.value.apply_to(format!("{:e}", reg.epsilon))
    );
    println!();

    println!("  {}", s.header.apply_to("Output"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Crop"),
        s.value
            .apply_to(format!("{0}x{0}", config.crop_size))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Format"),
        s.value.apply_to(&config.persistence.extension)
    );
    if config.preview {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Preview"),
            s.value.apply_to("enabled")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Preview"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();
}

pub fn print_run_report(report: &RunReport) {
    let s = Styles::new();

    println!("  {}", s.header.apply_to("Result"));
    if let Some(ref reference) = report.reference {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Reference"),
            s.path.apply_to(reference.display())
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Fused"),
        s.value.apply_to(format!(
            "{} of {} frames ({} registered, {} unaligned)",
            report.frames_fused,
            report.frames_loaded,
            report.registered_count(),
            report.fallback_count()
        ))
    );

    for frame in &report.frames {
        let name = frame
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("frame {}", frame.frame_index));
        match &frame.outcome {
            FrameOutcome::Registered(reg) => println!(
                "      {:<24}{}  {}",
                s.label.apply_to(name),
                s.method.apply_to(reg.transform),
                s.label.apply_to(format!("cc={:.4} it={}", reg.correlation, reg.iterations))
            ),
            FrameOutcome::Fallback(_) => println!(
                "      {:<24}{}",
                s.label.apply_to(name),
                s.disabled.apply_to("unaligned")
            ),
        }
    }

    if let Some(ref written) = report.written {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Noisy"),
            s.path.apply_to(written.noisy.display())
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("GT"),
            s.path.apply_to(written.ground_truth.display())
        );
    }
    if let Some(ref comparison) = report.comparison {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Preview"),
            s.path.apply_to(comparison.display())
        );
    }

    if report.is_degraded() {
        println!();
        println!("  {}", s.warning.apply_to("Diagnostics"));
        for diagnostic in &report.diagnostics {
            println!("    - {}", diagnostic);
        }
    }
    println!();
}

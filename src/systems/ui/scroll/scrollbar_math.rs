/// Clamped linear interpolation of `input` from `[input_min, input_max]` onto
/// `[output_min, output_max]`. Inputs outside the source range are clamped
/// first and never extrapolated; a degenerate source range maps to `output_min`.
pub fn linear_map(
    input: f32,
    input_min: f32,
    input_max: f32,
    output_min: f32,
    output_max: f32,
) -> f32 {
    let span = input_max - input_min;
    if span.abs() <= f32::EPSILON || !span.is_finite() {
        return output_min;
    }
    let normalized = ((input - input_min) / span).clamp(0.0, 1.0);
    output_min + normalized * (output_max - output_min)
}

/// Index flavour of [`linear_map`], rounding to the nearest output index so
/// equal spans map every index onto itself.
pub fn linear_map_index(
    input: usize,
    input_min: usize,
    input_max: usize,
    output_min: usize,
    output_max: usize,
) -> usize {
    if input_max <= input_min {
        return output_min;
    }
    let input = input.clamp(input_min, input_max);
    let normalized = (input - input_min) as f64 / (input_max - input_min) as f64;
    let span = output_max.saturating_sub(output_min) as f64;
    output_min + (normalized * span).round() as usize
}

/// Where the scroll bar should rest for `selected` out of `count` items on a
/// track running from `top` to `bottom`.
pub fn scroll_bar_target(selected: usize, count: usize, top: f32, bottom: f32) -> f32 {
    if count == 0 {
        return top;
    }
    linear_map(selected as f32, 0.0, (count - 1) as f32, top, bottom)
}

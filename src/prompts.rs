pub const GENERATE_MODEL: &str = include_str!("../data/prompts/generate_model.txt");
pub const EXTRACT_GARMENT: &str = include_str!("../data/prompts/extract_garment.txt");
pub const VIRTUAL_TRY_ON: &str = include_str!("../data/prompts/virtual_tryon.txt");
pub const POSE_VARIATION: &str = include_str!("../data/prompts/pose_variation.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

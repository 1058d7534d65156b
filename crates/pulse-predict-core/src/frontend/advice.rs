//! Static advisory text.

pub const ARRHYTHMIA_ALERT: &str = "Arrhythmia Detected! Immediate attention advised.";
pub const HEART_SAFE_MESSAGE: &str = "Heart is Safe - No signs of arrhythmia.";

pub const PRECAUTIONS_TITLE: &str = "Show Precautionary Measures";
pub const PRECAUTIONS_HEADING: &str = "Precautionary Measures You Should Take:";

pub const PRECAUTIONS: [&str; 8] = [
    "Consult a Cardiologist: Book an appointment immediately to discuss ECG and further diagnostics.",
    "Medication Compliance: Follow prescribed medications strictly (e.g., beta-blockers, anticoagulants).",
    "Heart-Healthy Diet: Low-sodium, high-fiber, avoid caffeine and processed foods.",
    "Avoid Triggers: Minimize stress, smoking, alcohol, and overexertion.",
    "Practice Stress Reduction: Yoga, meditation, and deep-breathing exercises help lower heart strain.",
    "Monitor Regularly: Use wearable devices or follow-up with Holter monitoring.",
    "Controlled Physical Activity: Engage in light to moderate walking or doctor-approved exercise.",
    "Control Underlying Conditions: Manage diabetes, hypertension, and cholesterol levels.",
];

pub const EMERGENCY_WARNING: &str = "Emergency Warning Signs: Chest pain, fainting, shortness of breath, or extreme fatigue? Go to the hospital immediately.";

pub const PREDICTIONS_COMPLETE: &str = "Predictions complete!";
pub const DOWNLOAD_LABEL: &str = "Download Results";
pub const DISEASE_CHANCE_LABEL: &str = "Predicted Disease Chance";

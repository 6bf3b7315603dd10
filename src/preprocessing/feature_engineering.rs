//! Feature engineering: производные признаки и сырой фрейм для пайплайна

use crate::error::{PipelineError, Result};
use crate::types::{Frame, SurveyAnswers, Value};

/// Колонки сырой записи в том порядке, в котором на них обучался пайплайн
pub const RAW_COLUMNS: [&str; 17] = [
    "Gender",
    "Age",
    "Height",
    "Weight",
    "family_history",
    "FAVC",
    "FCVC",
    "NCP",
    "CAEC",
    "SMOKE",
    "CH2O",
    "SCC",
    "FAF",
    "TUE",
    "CALC",
    "MTRANS",
    "BMI",
];

pub struct FeatureEngineer;

impl FeatureEngineer {
    /// ИМТ = вес (кг) / рост (м)^2
    pub fn compute_bmi(height: f64, weight: f64) -> Result<f64> {
        if !height.is_finite() || height <= 0.0 {
            return Err(PipelineError::InvalidInput(format!(
                "height must be positive, got {height}"
            )));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(PipelineError::InvalidInput(format!(
                "weight must be positive, got {weight}"
            )));
        }
        Ok(weight / height.powi(2))
    }

    pub fn raw_row(answers: &SurveyAnswers) -> Result<Vec<Value>> {
        let bmi = Self::compute_bmi(answers.height, answers.weight)?;

        let numeric = [
            ("Age", answers.age),
            ("FCVC", answers.fcvc),
            ("NCP", answers.ncp),
            ("CH2O", answers.ch2o),
            ("FAF", answers.faf),
            ("TUE", answers.tue),
        ];
        if let Some((name, v)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PipelineError::InvalidInput(format!("{name} is not finite: {v}")));
        }

        Ok(vec![
            answers.gender.as_str().into(),
            answers.age.into(),
            answers.height.into(),
            answers.weight.into(),
            answers.family_history.as_str().into(),
            answers.favc.as_str().into(),
            answers.fcvc.into(),
            answers.ncp.into(),
            answers.caec.as_str().into(),
            answers.smoke.as_str().into(),
            answers.ch2o.into(),
            answers.scc.as_str().into(),
            answers.faf.into(),
            answers.tue.into(),
            answers.calc.as_str().into(),
            answers.mtrans.as_str().into(),
            bmi.into(),
        ])
    }

    /// Фрейм из набора анкет (одна строка на анкету), включая ИМТ
    pub fn build_frame(records: &[SurveyAnswers]) -> Result<Frame> {
        let mut frame = Frame::new(RAW_COLUMNS.iter().map(|c| c.to_string()).collect());
        for answers in records {
            frame.push_row(Self::raw_row(answers)?)?;
        }
        Ok(frame)
    }
}

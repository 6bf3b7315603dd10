#![allow(dead_code)]

use std::path::PathBuf;

use obesity_risk::{
    FeatureEngineer, LogisticModel, ModelArtifact, Pipeline, RiskPredictor, SurveyAnswers, Transformer,
};

pub struct Person {
    pub gender: &'static str,
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub family_history: &'static str,
    pub caec: &'static str,
    pub calc: &'static str,
    pub mtrans: &'static str,
}

pub fn answers(p: &Person) -> SurveyAnswers {
    SurveyAnswers {
        gender: p.gender.into(),
        age: p.age,
        height: p.height,
        weight: p.weight,
        family_history: p.family_history.into(),
        favc: (if p.weight > 80.0 { "yes" } else { "no" }).into(),
        fcvc: 2.0,
        ncp: 3.0,
        caec: p.caec.into(),
        smoke: (if p.age > 50.0 { "yes" } else { "no" }).into(),
        ch2o: 2.0,
        scc: (if p.age < 25.0 { "yes" } else { "no" }).into(),
        faf: 1.0,
        tue: 1.0,
        calc: p.calc.into(),
        mtrans: p.mtrans.into(),
    }
}

pub const LOWEST_BMI: Person = Person {
    gender: "Female",
    age: 26.0,
    height: 1.50,
    weight: 40.0,
    family_history: "no",
    caec: "no",
    calc: "no",
    mtrans: "Bike",
};

pub const HIGHEST_BMI: Person = Person {
    gender: "Male",
    age: 45.0,
    height: 1.70,
    weight: 130.0,
    family_history: "yes",
    caec: "Always",
    calc: "Sometimes",
    mtrans: "Automobile",
};

/// CALC "Always" в обучающей выборке не встречается
pub fn training_answers() -> Vec<SurveyAnswers> {
    let people = [
        Person { gender: "Female", age: 21.0, height: 1.62, weight: 64.0, family_history: "yes", caec: "Sometimes", calc: "no", mtrans: "Public_Transportation" },
        Person { gender: "Male", age: 23.0, height: 1.80, weight: 77.0, family_history: "no", caec: "Frequently", calc: "Sometimes", mtrans: "Walking" },
        Person { gender: "Male", age: 27.0, height: 1.80, weight: 87.0, family_history: "yes", caec: "Sometimes", calc: "Frequently", mtrans: "Automobile" },
        LOWEST_BMI,
        HIGHEST_BMI,
        Person { gender: "Female", age: 55.0, height: 1.55, weight: 80.0, family_history: "yes", caec: "Sometimes", calc: "no", mtrans: "Motorbike" },
        Person { gender: "Male", age: 18.0, height: 1.87, weight: 70.0, family_history: "no", caec: "Frequently", calc: "Frequently", mtrans: "Public_Transportation" },
        Person { gender: "Female", age: 61.0, height: 1.60, weight: 95.0, family_history: "yes", caec: "Always", calc: "Sometimes", mtrans: "Walking" },
    ];
    people.iter().map(answers).collect()
}

pub fn fitted_pipeline() -> Pipeline {
    let frame = FeatureEngineer::build_frame(&training_answers()).unwrap();
    let mut pipeline = Pipeline::obesity();
    pipeline.fit(&frame).unwrap();
    pipeline
}

/// p = sigmoid(8 * BMI_scaled - 4): минимальный ИМТ -> ~0.018, максимальный -> ~0.982
pub fn bmi_model(pipeline: &Pipeline) -> ModelArtifact {
    let names = pipeline.output_columns().unwrap().to_vec();
    let coefficients = names
        .iter()
        .map(|n| if n == "BMI" { 8.0 } else { 0.0 })
        .collect();
    ModelArtifact::Logistic(LogisticModel::new(names, coefficients, -4.0).unwrap())
}

pub fn predictor() -> RiskPredictor {
    let pipeline = fitted_pipeline();
    let model = bmi_model(&pipeline);
    RiskPredictor::new(pipeline, model).unwrap()
}

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("obesity-risk-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

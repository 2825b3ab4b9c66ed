// ABOUTME: Deterministic Italian clinical prompt construction for the narrative provider
// ABOUTME: Assembles patient demographics, lab values, and interpretations into one prompt string
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Metabolica

//! # Narrative Prompt Builder
//!
//! Builds the natural-language prompt sent to the text-generation provider
//! when a doctor requests an AI summary for a report. The builder is pure:
//! given the same record and reference year it always produces the same
//! string, it never fails, and it performs no I/O. Sending the prompt and
//! handling provider failures belongs to [`crate::llm`].

use chrono::Datelike;

use super::interpreter::{interpret_bmi, interpret_homa_ir, interpret_tg_hdl};
use crate::models::PatientRecord;

/// Build the report prompt against the current calendar year.
#[must_use]
pub fn report_prompt(record: &PatientRecord) -> String {
    report_prompt_for_year(record, chrono::Utc::now().year())
}

/// Build the report prompt with an explicit reference year.
///
/// Age is computed as `reference_year - birth_year`, a deliberately coarse
/// approximation carried over from the product contract (no day-of-year
/// correction). The prompt asks for exactly 3 prioritized recommendations,
/// plain paragraphs without markup, and a 200-word cap, in formal Italian.
#[must_use]
pub fn report_prompt_for_year(record: &PatientRecord, reference_year: i32) -> String {
    let age = reference_year - record.birth_date.year();
    let homa = interpret_homa_ir(record.homa_ir);
    let tg_hdl = interpret_tg_hdl(record.tg_hdl_ratio);
    let bmi = interpret_bmi(record.bmi);

    format!(
        "Sei un medico esperto in medicina metabolica e funzionale.\n\
         Scrivi una breve \"Valutazione Clinica e Conclusioni\" per un referto medico basato sui seguenti dati.\n\
         Usa un tono professionale, medico, formale e in italiano.\n\
         \n\
         Dati Paziente:\n\
         - Nome: {first_name} {last_name}\n\
         - Sesso: {gender}\n\
         - Età: {age} anni\n\
         - BMI: {bmi_value} ({bmi_description})\n\
         \n\
         Dati Laboratorio:\n\
         - Glicemia: {glucose} mg/dL\n\
         - Insulina: {insulin} uIU/mL\n\
         - Trigliceridi: {triglycerides} mg/dL\n\
         - HDL: {hdl} mg/dL\n\
         \n\
         Risultati Calcolati:\n\
         - HOMA-IR: {homa_value} (Interpretazione: {homa_description})\n\
         - Rapporto TG/HDL: {tg_hdl_value} (Interpretazione: {tg_hdl_description})\n\
         \n\
         Istruzioni per l'output:\n\
         1. Analizza sinteticamente lo stato metabolico (resistenza insulinica, rischio cardiovascolare lipidico).\n\
         2. Fornisci 3 raccomandazioni cliniche/nutrizionali prioritarie basate sui valori alterati (se presenti).\n\
         3. Non usare markdown o bold, solo testo piano formattato in paragrafi chiari.\n\
         4. Sii diretto e costruttivo.\n\
         5. Lunghezza massima 200 parole.",
        first_name = record.first_name,
        last_name = record.last_name,
        gender = record.gender.as_str(),
        age = age,
        bmi_value = record.bmi,
        bmi_description = bmi.description,
        glucose = record.glucose,
        insulin = record.insulin,
        triglycerides = record.triglycerides,
        hdl = record.hdl,
        homa_value = record.homa_ir,
        homa_description = homa.description,
        tg_hdl_value = record.tg_hdl_ratio,
        tg_hdl_description = tg_hdl.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn sample_record() -> PatientRecord {
        let mut record = PatientRecord {
            id: Uuid::new_v4(),
            user_id: None,
            first_name: "Anna".into(),
            last_name: "Bianchi".into(),
            birth_date: NaiveDate::from_ymd_opt(1980, 7, 1).unwrap(),
            gender: Gender::F,
            created_at: Utc::now(),
            weight: 70.0,
            height: 175.0,
            ideal_weight: None,
            bmi: 0.0,
            glucose: 90.0,
            insulin: 10.0,
            hdl: 50.0,
            triglycerides: 150.0,
            homa_ir: 0.0,
            tg_hdl_ratio: 0.0,
            ai_analysis: None,
        };
        record.recompute_metrics();
        record
    }

    #[test]
    fn prompt_is_never_empty_and_deterministic() {
        let record = sample_record();
        let a = report_prompt_for_year(&record, 2026);
        let b = report_prompt_for_year(&record, 2026);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_contains_three_recommendation_instruction() {
        let prompt = report_prompt_for_year(&sample_record(), 2026);
        assert!(prompt.contains("3 raccomandazioni"));
        assert!(prompt.contains("200 parole"));
    }

    #[test]
    fn prompt_uses_coarse_year_difference_age() {
        // Born 1980-07-01, reference year 2026: always 46, regardless of
        // whether the birthday has passed
        let prompt = report_prompt_for_year(&sample_record(), 2026);
        assert!(prompt.contains("Età: 46 anni"));
    }

    #[test]
    fn prompt_embeds_lab_values_and_interpretations() {
        let prompt = report_prompt_for_year(&sample_record(), 2026);
        assert!(prompt.contains("Glicemia: 90 mg/dL"));
        assert!(prompt.contains("HOMA-IR: 2.22"));
        assert!(prompt.contains("Insulino-resistenza precoce"));
        assert!(prompt.contains("Rapporto TG/HDL: 3"));
    }

    #[test]
    fn prompt_tolerates_empty_names() {
        let mut record = sample_record();
        record.first_name = String::new();
        record.last_name = String::new();
        let prompt = report_prompt_for_year(&record, 2026);
        assert!(!prompt.is_empty());
        assert!(prompt.contains("Nome:  "));
    }
}

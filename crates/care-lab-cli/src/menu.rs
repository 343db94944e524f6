//! Interactive console menu.
//!
//! Reads answers line by line from any `BufRead` and writes prompts to any
//! `Write`, so the same loop serves the terminal and tests. Operation
//! errors are printed and the menu keeps running; end of input exits.

use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use care_lab_core::intake::{parse_birth_date, TestSelection};
use care_lab_core::{Clinic, ClinicError, NewPatient, Sex};

use crate::render;

const OPTIONS: &str = "\
1. Registrar paciente
2. Listar pacientes
3. Capturar resultado
4. Imprimir reporte
5. Ver resumen
0. Salir";

/// Console menu over a clinic.
pub struct Menu<'a, R, W> {
    clinic: Clinic<'a>,
    input: R,
    output: W,
}

/// How a menu action ended.
enum Step {
    Done,
    /// Input ended in the middle of a form
    Eof,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(clinic: Clinic<'a>, input: R, output: W) -> Self {
        Self {
            clinic,
            input,
            output,
        }
    }

    /// Run until the user picks "0" or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n=== {} ===", self.clinic.config().lab_name)?;
            writeln!(self.output, "{}", OPTIONS)?;
            let Some(choice) = self.prompt("Opción")? else {
                return Ok(());
            };
            debug!(choice = %choice, "menu option");
            let step = match choice.as_str() {
                "1" => self.register()?,
                "2" => self.list()?,
                "3" => self.record_result()?,
                "4" => self.report()?,
                "5" => self.summary()?,
                "0" => return Ok(()),
                _ => {
                    writeln!(self.output, "Opción no válida")?;
                    Step::Done
                }
            };
            if let Step::Eof = step {
                return Ok(());
            }
        }
    }

    /// Print a label and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report_error(&mut self, error: ClinicError) -> io::Result<Step> {
        writeln!(self.output, "Error: {}", error)?;
        Ok(Step::Done)
    }

    fn register(&mut self) -> io::Result<Step> {
        let Some(name) = self.prompt("Nombre")? else {
            return Ok(Step::Eof);
        };
        let birth_date = loop {
            let Some(answer) = self.prompt("Fecha de nacimiento (AAAA-MM-DD, vacío para capturar edad)")? else {
                return Ok(Step::Eof);
            };
            if answer.is_empty() {
                break answer;
            }
            match parse_birth_date(&answer) {
                Ok(_) => break answer,
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        };
        let manual_age = if birth_date.is_empty() {
            let Some(age) = self.prompt("Edad")? else {
                return Ok(Step::Eof);
            };
            Some(age)
        } else {
            None
        };
        let sex = loop {
            let Some(answer) = self.prompt("Sexo (M/F/O)")? else {
                return Ok(Step::Eof);
            };
            match answer.parse::<Sex>() {
                Ok(sex) => break sex,
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        };
        let Some(diagnosis) = self.prompt("Diagnóstico")? else {
            return Ok(Step::Eof);
        };
        let Some(physician) = self.prompt("Médico")? else {
            return Ok(Step::Eof);
        };
        let tests = loop {
            let Some(answer) = self.prompt("Pruebas (claves separadas por coma, CLAVE:sigma)")? else {
                return Ok(Step::Eof);
            };
            let parsed: Result<Vec<TestSelection>, _> = answer
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect();
            match parsed {
                Ok(tests) => break tests,
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        };

        let new = NewPatient {
            name,
            birth_date: Some(birth_date),
            manual_age,
            sex,
            diagnosis,
            physician,
            tests,
        };
        match self.clinic.register_patient(new, now()) {
            Ok(patient) => {
                writeln!(self.output, "Paciente registrado con folio {}", patient.folio)?;
                Ok(Step::Done)
            }
            Err(e) => self.report_error(e),
        }
    }

    fn list(&mut self) -> io::Result<Step> {
        match self.clinic.list_patients() {
            Ok(patients) if patients.is_empty() => {
                writeln!(self.output, "No hay pacientes registrados.")?;
                Ok(Step::Done)
            }
            Ok(patients) => {
                writeln!(self.output, "{}", render::patients_table(&patients))?;
                Ok(Step::Done)
            }
            Err(e) => self.report_error(e),
        }
    }

    fn record_result(&mut self) -> io::Result<Step> {
        let Some(folio) = self.prompt("Folio")? else {
            return Ok(Step::Eof);
        };
        let patient = match self.clinic.patient(&folio) {
            Ok(patient) => patient,
            Err(e) => return self.report_error(e),
        };
        if !patient.tests.is_empty() {
            writeln!(self.output, "{}", render::order_table(&patient))?;
        }
        let Some(key) = self.prompt("Clave de prueba o parámetro")? else {
            return Ok(Step::Eof);
        };
        let Some(value) = self.prompt("Resultado")? else {
            return Ok(Step::Eof);
        };
        match self.clinic.record_result(&folio, &key, &value, now()) {
            Ok(result) => {
                writeln!(self.output, "Resultado guardado: {} = {} {}", result.name, result.value, result.unit)?;
                Ok(Step::Done)
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report(&mut self) -> io::Result<Step> {
        let Some(folio) = self.prompt("Folio")? else {
            return Ok(Step::Eof);
        };
        match self.clinic.report(&folio, now().date()) {
            Ok(report) => {
                write!(self.output, "{}", report.to_text())?;
                Ok(Step::Done)
            }
            Err(e) => self.report_error(e),
        }
    }

    fn summary(&mut self) -> io::Result<Step> {
        let Some(folio) = self.prompt("Folio")? else {
            return Ok(Step::Eof);
        };
        match self.clinic.summary(&folio) {
            Ok(summary) => {
                writeln!(self.output, "{}", render::summary_text(&summary))?;
                Ok(Step::Done)
            }
            Err(e) => self.report_error(e),
        }
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

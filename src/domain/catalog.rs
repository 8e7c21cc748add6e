//! Activities offered by the school, loaded into the store at startup.

use super::Activity;

const CATALOG: &[(&str, &str, &str, u32, [&str; 2])] = &[
    (
        "Clube de Xadrez",
        "Aprenda estratégias e participe de torneios de xadrez",
        "Sextas, 15h30 - 17h",
        12,
        ["michael@mergington.edu", "daniel@mergington.edu"],
    ),
    (
        "Aula de Programação",
        "Aprenda fundamentos de programação e desenvolva projetos de software",
        "Terças e quintas, 15h30 - 16h30",
        20,
        ["emma@mergington.edu", "sophia@mergington.edu"],
    ),
    (
        "Educação Física",
        "Educação física e atividades esportivas",
        "Segundas, quartas e sextas, 14h - 15h",
        30,
        ["john@mergington.edu", "olivia@mergington.edu"],
    ),
    // Sports
    (
        "Futebol",
        "Participe do time de futebol da escola e jogue campeonatos",
        "Terças e quintas, 16h - 17h30",
        22,
        ["lucas@mergington.edu", "marcos@mergington.edu"],
    ),
    (
        "Vôlei",
        "Aulas e treinos de vôlei para todos os níveis",
        "Quartas e sextas, 15h - 16h30",
        18,
        ["ana@mergington.edu", "carla@mergington.edu"],
    ),
    // Arts
    (
        "Teatro",
        "Oficina de teatro com apresentações semestrais",
        "Segundas e quartas, 16h - 17h30",
        15,
        ["bruno@mergington.edu", "lara@mergington.edu"],
    ),
    (
        "Clube de Música",
        "Aprenda instrumentos e participe da banda escolar",
        "Sextas, 14h - 15h30",
        12,
        ["rafael@mergington.edu", "juliana@mergington.edu"],
    ),
    // Academics
    (
        "Olimpíada de Matemática",
        "Prepare-se para olimpíadas de matemática com aulas e desafios",
        "Terças, 17h - 18h",
        25,
        ["paulo@mergington.edu", "camila@mergington.edu"],
    ),
    (
        "Clube de Leitura",
        "Leitura e discussão de livros clássicos e contemporâneos",
        "Quintas, 16h - 17h",
        20,
        ["aline@mergington.edu", "fernando@mergington.edu"],
    ),
];

/// The initial activity catalog, with each activity's starting roster
pub fn initial_activities() -> Vec<Activity> {
    CATALOG
        .iter()
        .map(
            |(name, description, schedule, max_participants, participants)| Activity {
                name: name.to_string(),
                description: description.to_string(),
                schedule: schedule.to_string(),
                max_participants: *max_participants,
                participants: participants.iter().map(|p| p.to_string()).collect(),
            },
        )
        .collect()
}

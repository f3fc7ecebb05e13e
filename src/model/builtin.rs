// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in questionnaire content (treated as configuration data).

use super::catalog::{Block, Catalog, CatalogError, Cell};
use super::ids::{BlockId, CellId};

const TITLE: &str = "Feedforward Canvas";
const FILE_STEM: &str = "Feedforward-Canvas";

struct CellDef {
    id: &'static str,
    title: &'static str,
    prompt: &'static str,
    questions: &'static [&'static str],
}

struct BlockDef {
    id: &'static str,
    title: &'static str,
    color: &'static str,
    cells: &'static [CellDef],
}

const BLOCKS: &[BlockDef] = &[
    BlockDef {
        id: "bloque1",
        title: "Bloque 1: Perfil y Objetivos del Cliente",
        color: "from-cyan-400 to-violet-400",
        cells: &[
            CellDef {
                id: "c1",
                title: "Casilla 1 – Perfil operativo (Quién es y cómo funciona)",
                prompt: "Queremos entender mejor cómo funciona su operación hoy, para identificar juntos dónde Veolia podría aportar mayor valor en los próximos meses.",
                questions: &[
                    "¿En qué procesos se concentra el mayor consumo de agua o energía, o la mayor generación de residuos?",
                    "Si pudieran mejorar un proceso en los próximos 3 meses, ¿cuál generaría el mayor ahorro o impacto positivo?",
                ],
            },
            CellDef {
                id: "c2",
                title: "Casilla 2 – Objetivos y prioridades de negocio",
                prompt: "Queremos conocer hacia dónde se proyecta su operación, para alinear nuestras soluciones al rumbo que están construyendo.",
                questions: &[
                    "Si tuviera que elegir uno de estos tres caminos como prioridad estratégica -descarbonizar, regenerar o descontaminar-, ¿cuál marcaría el norte de su operación hoy?",
                    "¿En qué plazo esperan ver avances en esas prioridades: corto (3 meses), medio (6 meses) o más largo (12 meses)?",
                ],
            },
        ],
    },
    BlockDef {
        id: "bloque2",
        title: "Bloque 2: Operación y Regulaciones",
        color: "from-emerald-400 to-cyan-400",
        cells: &[
            CellDef {
                id: "c3",
                title: "Casilla 3 – Indicadores críticos de operación (KPIs)",
                prompt: "Nos interesa saber qué indicadores son clave para ustedes, para explorar cómo podrían mejorar de manera medible en los próximos meses.",
                questions: &[
                    "¿Qué indicadores de consumo, costos o continuidad de equipos siguen más de cerca en su operación, y qué metas se han fijado para mejorarlos en los próximos meses?",
                ],
            },
            CellDef {
                id: "c4",
                title: "Casilla 4 – Regulaciones y licencias",
                prompt: "Sabemos que el entorno regulatorio cambia constantemente. Queremos identificar con ustedes cómo anticipar esos cambios y convertirlos en oportunidades de valor.",
                questions: &[
                    "¿Qué auditorías, inspecciones o normas recientes han representado mayor reto para su operación?",
                    "¿Qué fechas o compromisos regulatorios tienen próximos en el radar (renovación de permisos, reportes, auditorías)?",
                    "¿Qué apoyo adicional de Veolia les daría más tranquilidad frente al cumplimiento regulatorio?",
                ],
            },
        ],
    },
    BlockDef {
        id: "bloque3",
        title: "Bloque 3: Relación con Veolia y Contratos Vigentes",
        color: "from-fuchsia-400 to-rose-400",
        cells: &[
            CellDef {
                id: "c5",
                title: "Casilla 5 – Servicios actuales y contratos",
                prompt: "Queremos conocer cómo valoran los servicios actuales de Veolia y explorar juntos cómo podríamos fortalecerlos o ampliarlos en el corto plazo.",
                questions: &[
                    "De los servicios que hoy reciben de Veolia, ¿cuáles consideran más esenciales para su operación diaria?",
                    "¿Hay algún servicio de Veolia que ven con potencial de fortalecerse o crecer en el corto plazo?",
                    "¿Qué momentos clave tienen identificados en sus contratos actuales (renovación, prórroga o revisión)?",
                ],
            },
            CellDef {
                id: "c6",
                title: "Casilla 6 – Personas clave y proceso de decisiones",
                prompt: "Queremos entender cómo se toman las decisiones en su organización, para acompañarlos con la información y el soporte adecuados.",
                questions: &[
                    "¿Quiénes participan normalmente en la decisión de ampliar o renovar un servicio como los de Veolia?",
                    "¿Qué información o acompañamiento les resulta más útil para facilitar la aprobación interna?",
                ],
            },
        ],
    },
    BlockDef {
        id: "bloque4",
        title: "Bloque 4: Dolencias y Datos",
        color: "from-cyan-400 to-indigo-400",
        cells: &[
            CellDef {
                id: "c7",
                title: "Casilla 7 – Dolencias y riesgos recientes",
                prompt: "Queremos identificar qué situaciones recientes han generado presión en su operación, para encontrar juntos cómo evitar que se repitan.",
                questions: &[
                    "¿Cuáles situaciones recientes (como interrupciones operativas, sanciones, reprocesos o reclamos) han generado mayores costos o dificultades en su operación?",
                    "¿Qué impacto tuvieron esas situaciones en costos, tiempo o imagen de la empresa?",
                    "De estas situaciones, ¿cuál sería la prioridad número uno a prevenir?",
                ],
            },
            CellDef {
                id: "c8",
                title: "Casilla 8 – Datos y digitalización",
                prompt: "Sabemos que los datos son clave para anticipar mejoras. Queremos entender qué información ya gestionan y cómo podemos ayudarles a aprovecharla mejor.",
                questions: &[
                    "¿Qué sistemas o mediciones utilizan actualmente para controlar agua, energía o residuos (y con qué frecuencia)?",
                    "¿De qué manera les gustaría que Veolia los ayude a usar esa información para anticipar problemas o detectar oportunidades de mejora?",
                    "¿Estarían abiertos a explorar un piloto/diagnóstico basado en datos para anticipar esas mejoras?",
                ],
            },
        ],
    },
    BlockDef {
        id: "bloque5",
        title: "Bloque 5: Sostenibilidad y Oportunidades",
        color: "from-emerald-400 to-teal-400",
        cells: &[
            CellDef {
                id: "c9",
                title: "Casilla 9 – Agenda de sostenibilidad y circularidad",
                prompt: "Queremos conocer sus metas de sostenibilidad, para ver cómo nuestras soluciones pueden acelerar su cumplimiento.",
                questions: &[
                    "¿Qué metas específicas se han propuesto en agua, residuos o energía para los próximos años, y hacia qué fecha esperan cumplirlas (2027, 2030…)?",
                    "¿Qué compromisos de sostenibilidad -como certificaciones, reportes o metas de carbono- son hoy más relevantes para su empresa?",
                    "¿En qué aspectos sienten que un aliado como Veolia podría apoyarlos para alcanzar esas metas?",
                ],
            },
            CellDef {
                id: "c10",
                title: "Casilla 10 – Oportunidades de valor (triggers)",
                prompt: "Queremos aprovechar su experiencia con Veolia para descubrir nuevas soluciones que generen valor adicional en su operación.",
                questions: &[
                    "¿En qué procesos identifican hoy oportunidades claras de mejora, como reducir costos de agua, valorizar residuos o ganar eficiencia energética?",
                    "Si pensaran en mejoras rápidas, ¿qué cambios les gustaría ver resueltos en los próximos 3 a 6 meses?",
                ],
            },
        ],
    },
    BlockDef {
        id: "bloque6",
        title: "Bloque 6: Promotor y Expansión",
        color: "from-sky-400 to-indigo-400",
        cells: &[
            CellDef {
                id: "c11",
                title: "Casilla 11 – Lo que valoran y cómo expandirlo",
                prompt: "Como promotores de Veolia, queremos explorar cómo podemos extender esa experiencia positiva a nuevas áreas de su operación.",
                questions: &[
                    "De su relación actual con Veolia, ¿qué valoran más: el cumplimiento, el soporte, el impacto ambiental u otro aspecto?",
                    "Si trasladaran esa experiencia positiva a otra parte de su operación, ¿dónde creen que Veolia podría aportar un valor similar?",
                ],
            },
            CellDef {
                id: "c12",
                title: "Casilla 12 – Renovación y plan de expansión",
                prompt: "Queremos definir con ustedes los próximos pasos de la relación: cómo asegurar continuidad con confianza y activar nuevas oportunidades de crecimiento.",
                questions: &[
                    "¿Qué fechas próximas de renovación o decisiones clave tienen en el radar?",
                    "¿Qué pasos iniciales podríamos dar desde ya para asegurar que la próxima renovación sea fluida (por ejemplo, un diagnóstico, piloto o propuesta conjunta)?",
                    "¿Qué condiciones serían críticas para que ustedes decidieran no renovar?",
                    "De todo lo conversado, ¿qué oportunidad les entusiasmaría más comenzar de inmediato, sabiendo que podría dar resultados visibles en menos de 6 meses?",
                ],
            },
        ],
    },
];

pub(crate) fn catalog() -> Result<Catalog, CatalogError> {
    let blocks = BLOCKS
        .iter()
        .map(|block| {
            let cells = block
                .cells
                .iter()
                .map(|cell| {
                    Cell::new(
                        CellId::new(cell.id).expect("built-in cell ids are non-empty"),
                        cell.title,
                        cell.prompt,
                        cell.questions.iter().map(|q| (*q).to_owned()).collect(),
                    )
                })
                .collect();
            Block::new(
                BlockId::new(block.id).expect("built-in block ids are non-empty"),
                block.title,
                block.color,
                cells,
            )
        })
        .collect();

    Catalog::new(TITLE, FILE_STEM, blocks)
}

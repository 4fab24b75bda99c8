//! Curated keyword tables for CV extraction and job inference.
//!
//! Entries are written in display form; callers normalize them before
//! matching. Both languages are always loaded so bilingual CVs work.

/// Industry tag → technical skills. Table order breaks industry ties.
pub const INDUSTRY_SKILLS: &[(&str, &[&str])] = &[
    (
        "software",
        &[
            "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "Go", "Rust", "PHP",
            "Ruby", "Kotlin", "Swift", "Node.js", "React", "Angular", "Vue", "Django", "Flask",
            "FastAPI", "Spring Boot", "Express", ".NET", "Laravel", "HTML", "CSS", "SQL",
            "PostgreSQL", "MySQL", "MongoDB", "Redis", "Docker", "Kubernetes", "AWS", "Azure",
            "GCP", "Git", "Linux", "REST", "GraphQL", "CI/CD", "Terraform", "Microservicios",
            "Microservices", "Android", "iOS", "Flutter", "React Native", "Unity",
        ],
    ),
    (
        "data",
        &[
            "Machine Learning", "Aprendizaje Automático", "Deep Learning", "Data Science",
            "Ciencia de Datos", "Pandas", "NumPy", "Scikit-learn", "TensorFlow", "PyTorch",
            "Power BI", "Tableau", "Excel", "Estadística", "Statistics", "R Studio", "Spark",
            "Hadoop", "ETL", "Big Data", "NLP", "Computer Vision", "Visión por Computadora",
            "Data Warehouse", "Airflow", "Jupyter", "SPSS", "MATLAB",
        ],
    ),
    (
        "design",
        &[
            "Figma", "Adobe XD", "Photoshop", "Illustrator", "InDesign", "After Effects",
            "Premiere", "Sketch", "UX", "UI", "Diseño UX", "Diseño UI", "User Research",
            "Prototipado", "Prototyping", "Blender", "Diseño Gráfico", "Graphic Design",
            "Branding", "Wireframes", "Design Thinking",
        ],
    ),
    (
        "engineering",
        &[
            "AutoCAD", "SolidWorks", "CATIA", "ANSYS", "Revit", "PLC", "SCADA", "Lean",
            "Six Sigma", "Kaizen", "Manufactura", "Manufacturing", "Calidad", "Quality Control",
            "Control de Calidad", "ISO 9001", "Mantenimiento", "Maintenance", "Arduino",
            "Electrónica", "Electronics", "Simulink", "LabVIEW", "Robótica", "Robotics",
        ],
    ),
    (
        "business",
        &[
            "Contabilidad", "Accounting", "Finanzas", "Finance", "SAP", "ERP", "CRM",
            "Salesforce", "Marketing Digital", "Digital Marketing", "SEO", "SEM",
            "Google Analytics", "Ventas", "Sales", "Recursos Humanos", "Human Resources",
            "Logística", "Logistics", "Cadena de Suministro", "Supply Chain", "Auditoría",
            "Auditing", "Scrum", "Agile", "Project Management", "Gestión de Proyectos",
            "Office", "Facturación", "Nóminas", "Payroll",
        ],
    ),
    (
        "health",
        &[
            "Enfermería", "Nursing", "Farmacología", "Pharmacology", "Nutrición", "Nutrition",
            "Primeros Auxilios", "First Aid", "Laboratorio Clínico", "Clinical Laboratory",
            "Epidemiología", "Epidemiology", "Psicología", "Psychology", "Fisioterapia",
            "Physiotherapy",
        ],
    ),
];

/// Industry-agnostic soft skills as (Spanish, English) concept pairs.
/// Either form matches; output uses the CV's detected language.
pub const SOFT_SKILLS: &[(&str, &str)] = &[
    ("Trabajo en equipo", "Teamwork"),
    ("Liderazgo", "Leadership"),
    ("Comunicación", "Communication"),
    ("Resolución de problemas", "Problem solving"),
    ("Pensamiento crítico", "Critical thinking"),
    ("Adaptabilidad", "Adaptability"),
    ("Creatividad", "Creativity"),
    ("Proactividad", "Proactive"),
    ("Organización", "Organization"),
    ("Gestión del tiempo", "Time management"),
    ("Negociación", "Negotiation"),
    ("Empatía", "Empathy"),
    ("Responsabilidad", "Responsibility"),
    ("Autodidacta", "Self-taught"),
    ("Orientación a resultados", "Results oriented"),
    ("Trabajo bajo presión", "Work under pressure"),
    ("Colaboración", "Collaboration"),
    ("Atención al detalle", "Attention to detail"),
];

/// Words that mark a sentence as describing a project.
pub const PROJECT_INDICATORS: &[&str] = &[
    "proyecto", "proyectos", "desarrolle", "desarrollé", "implemente",
    "implementé", "implementacion", "diseñe", "diseñé", "construi", "construí", "cree",
    "creé", "automatice", "automaticé", "sistema", "aplicacion", "aplicación", "plataforma",
    "prototipo", "project", "projects", "developed", "built", "implemented", "designed",
    "created", "automated", "application", "app", "platform", "prototype", "system",
    "tesis", "thesis", "hackathon",
];

/// Small function-word sets for language detection.
pub const SPANISH_MARKERS: &[&str] = &[
    "de", "la", "el", "en", "y", "los", "las", "del", "con", "para", "por", "experiencia",
    "educacion", "habilidades", "universidad", "licenciatura", "ingenieria", "proyectos",
    "idiomas", "actual", "presente", "objetivo",
];

pub const ENGLISH_MARKERS: &[&str] = &[
    "the", "and", "of", "in", "with", "for", "to", "experience", "education", "skills",
    "university", "bachelor", "engineering", "projects", "languages", "present", "current",
    "objective", "summary",
];

pub const UNIVERSITY_KEYWORDS: &[&str] = &[
    "universidad", "university", "instituto", "institute", "tecnologico", "politecnico",
    "college", "escuela", "school", "facultad", "faculty", "unam", "ipn", "itesm", "uam",
    "udg", "uanl", "buap",
];

pub const DEGREE_KEYWORDS: &[&str] = &[
    "licenciatura", "licenciado", "ingenieria", "ingeniero", "maestria", "doctorado",
    "bachillerato", "tecnico superior", "carrera", "bachelor", "master", "degree",
    "engineering", "phd", "bsc", "msc", "mba", "diploma",
];

pub const CERTIFICATION_KEYWORDS: &[&str] = &[
    "certificacion", "certificado", "certificada", "certification", "certificate",
    "certified", "diplomado", "curso", "course", "bootcamp", "credential", "credencial",
];

/// Normalized language name → display name.
pub const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("espanol", "Español"),
    ("spanish", "Español"),
    ("ingles", "Inglés"),
    ("english", "Inglés"),
    ("frances", "Francés"),
    ("french", "Francés"),
    ("aleman", "Alemán"),
    ("german", "Alemán"),
    ("portugues", "Portugués"),
    ("portuguese", "Portugués"),
    ("italiano", "Italiano"),
    ("italian", "Italiano"),
    ("japones", "Japonés"),
    ("japanese", "Japonés"),
    ("chino", "Chino"),
    ("mandarin", "Chino"),
    ("chinese", "Chino"),
    ("coreano", "Coreano"),
    ("korean", "Coreano"),
    ("nahuatl", "Náhuatl"),
];

/// Normalized level word → display level.
pub const LANGUAGE_LEVELS: &[(&str, &str)] = &[
    ("nativo", "Nativo"),
    ("native", "Nativo"),
    ("lengua materna", "Nativo"),
    ("bilingue", "Bilingüe"),
    ("bilingual", "Bilingüe"),
    ("fluido", "Avanzado"),
    ("fluent", "Avanzado"),
    ("avanzado", "Avanzado"),
    ("advanced", "Avanzado"),
    ("intermedio", "Intermedio"),
    ("intermediate", "Intermedio"),
    ("basico", "Básico"),
    ("basic", "Básico"),
    ("elemental", "Básico"),
    ("a1", "A1"),
    ("a2", "A2"),
    ("b1", "B1"),
    ("b2", "B2"),
    ("c1", "C1"),
    ("c2", "C2"),
];

/// Seniority keywords, checked in order (first hit wins). `mid` precedes
/// `senior` because "semi senior" contains "senior".
pub const SENIORITY_KEYWORDS: &[(&str, &[&str])] = &[
    ("mid", &["semi senior", "semisenior", "ssr", "mid level"]),
    (
        "senior",
        &["senior", "sr", "tech lead", "lider tecnico", "arquitecto de software", "software architect"],
    ),
    ("junior", &["junior", "jr", "recien egresado", "recent graduate", "entry level"]),
    (
        "intern",
        &[
            "becario",
            "becaria",
            "practicante",
            "pasante",
            "intern",
            "internship",
            "practicas profesionales",
            "servicio social",
        ],
    ),
];
